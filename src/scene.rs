//! Per-frame drawing instructions: positions from the layout, emphasis from the
//! highlight set.

use crate::graph::{GraphData, Highlight, Importance};
use crate::layout::LayoutEngine;

const MAJOR_FILL: &str = "#3b82f6";
const SUPPORTING_FILL: &str = "#60a5fa";
const MINOR_FILL: &str = "#93c5fd";
const STROKE: &str = "#1e293b";
const SELECTED_STROKE: &str = "#f97316";
/// Stroke color of every link.
pub const LINK_STROKE: &str = "#94a3b8";
/// Fill color of every label.
pub const LABEL_FILL: &str = "#1e293b";

/// Fill color of a node.
pub fn importance_fill(importance: Importance) -> &'static str {
	match importance {
		Importance::Major => MAJOR_FILL,
		Importance::Supporting => SUPPORTING_FILL,
		Importance::Minor => MINOR_FILL,
	}
}

/// A node circle.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSprite {
	/// Node id.
	pub id: String,
	/// Center x.
	pub x: f64,
	/// Center y.
	pub y: f64,
	/// Drawn radius.
	pub radius: f64,
	/// Fill color.
	pub fill: &'static str,
	/// Stroke color.
	pub stroke: &'static str,
	/// Stroke width.
	pub stroke_width: f64,
	/// Opacity.
	pub opacity: f64,
}

/// A link line.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSprite {
	/// Start x.
	pub x1: f64,
	/// Start y.
	pub y1: f64,
	/// End x.
	pub x2: f64,
	/// End y.
	pub y2: f64,
	/// Line width.
	pub width: f64,
	/// Opacity.
	pub opacity: f64,
}

/// A node label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelSprite {
	/// Label text.
	pub text: String,
	/// Baseline start x.
	pub x: f64,
	/// Baseline y.
	pub y: f64,
	/// Opacity.
	pub opacity: f64,
}

/// Everything drawn in one frame, back to front: links, nodes, labels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	/// Links, drawn first.
	pub links: Vec<LinkSprite>,
	/// Nodes.
	pub nodes: Vec<NodeSprite>,
	/// Labels of major and supporting characters, drawn last.
	pub labels: Vec<LabelSprite>,
}

impl Scene {
	/// Compose a frame from the engine's current positions.
	///
	/// Links the engine cannot place are left out.
	pub fn compose(
		graph: &GraphData,
		engine: &LayoutEngine,
		highlight: &Highlight,
		selected: Option<&str>,
	) -> Self {
		let config = engine.config();
		let positions = engine.nodes();
		let mut scene = Scene::default();

		for link in &graph.links {
			let (Some(s), Some(t)) = (engine.index_of(&link.source), engine.index_of(&link.target))
			else {
				continue;
			};
			let (s, t) = (&positions[s], &positions[t]);
			scene.links.push(LinkSprite {
				x1: s.x,
				y1: s.y,
				x2: t.x,
				y2: t.y,
				width: link.value.sqrt().max(1.0),
				opacity: highlight.link_opacity(&link.source, &link.target),
			});
		}

		for (node, pos) in graph.nodes.iter().zip(positions) {
			let radius = config.display_radius(node.value as f64);
			let is_selected = selected == Some(node.id.as_str());
			let opacity = highlight.node_opacity(&node.id);
			scene.nodes.push(NodeSprite {
				id: node.id.clone(),
				x: pos.x,
				y: pos.y,
				radius,
				fill: importance_fill(node.importance),
				stroke: if is_selected { SELECTED_STROKE } else { STROKE },
				stroke_width: if is_selected { 3.0 } else { 1.5 },
				opacity,
			});
			if node.importance != Importance::Minor {
				scene.labels.push(LabelSprite {
					text: node.name.clone(),
					x: pos.x + radius + 2.0,
					y: pos.y + 4.0,
					opacity,
				});
			}
		}
		scene
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{
		Character, LINK_DIMMED, LINK_OPACITY, NODE_DIMMED, Relationship, build_graph,
	};
	use crate::layout::{LayoutConfig, Viewport};

	fn fixture() -> (GraphData, LayoutEngine, Vec<Relationship>) {
		let characters = vec![
			Character {
				name: "X".into(),
				importance: Importance::Major,
				mentions: 16,
				..Default::default()
			},
			Character {
				name: "Y".into(),
				importance: Importance::Supporting,
				..Default::default()
			},
			Character {
				name: "Z".into(),
				..Default::default()
			},
			Character {
				name: "W".into(),
				..Default::default()
			},
		];
		let rel = |s: &str, t: &str, strength: f64| Relationship {
			source: s.into(),
			target: t.into(),
			strength,
			..Default::default()
		};
		let relationships = vec![rel("X", "Y", 9.0), rel("X", "Z", 0.25), rel("Y", "W", 4.0)];
		let graph = build_graph(&characters, &relationships);
		let engine =
			LayoutEngine::new(&graph, Viewport::new(800.0, 600.0), LayoutConfig::default());
		(graph, engine, relationships)
	}

	#[test]
	fn sprites_follow_layout_positions() {
		let (graph, mut engine, _) = fixture();
		engine.tick();
		let scene = Scene::compose(&graph, &engine, &Highlight::All, None);

		assert_eq!(scene.nodes.len(), 4);
		assert_eq!(scene.links.len(), 3);
		for (sprite, node) in scene.nodes.iter().zip(engine.nodes()) {
			assert_eq!((sprite.x, sprite.y), (node.x, node.y));
		}
		assert_eq!(scene.nodes[0].radius, 14.0);
		assert_eq!(scene.nodes[0].fill, MAJOR_FILL);
		assert_eq!(scene.links[0].width, 3.0);
		assert_eq!(scene.links[1].width, 1.0);
	}

	#[test]
	fn only_major_and_supporting_are_labelled() {
		let (graph, engine, _) = fixture();
		let scene = Scene::compose(&graph, &engine, &Highlight::All, None);
		let labels: Vec<_> = scene.labels.iter().map(|l| l.text.as_str()).collect();
		assert_eq!(labels, ["X", "Y"]);
		assert_eq!(scene.labels[0].x, scene.nodes[0].x + 16.0);
	}

	#[test]
	fn selection_dims_everything_outside_the_neighborhood() {
		let (graph, engine, relationships) = fixture();
		let highlight = Highlight::compute(Some("X"), "", &[], &relationships);
		let scene = Scene::compose(&graph, &engine, &highlight, Some("X"));

		assert_eq!(scene.nodes[0].stroke, SELECTED_STROKE);
		assert_eq!(scene.nodes[0].stroke_width, 3.0);
		assert_eq!(scene.nodes[3].opacity, NODE_DIMMED);
		assert_eq!(scene.links[0].opacity, LINK_OPACITY);
		// Y is active but W is not, so Y-W stays dim.
		assert_eq!(scene.links[2].opacity, LINK_DIMMED);
	}
}
