//! Pointer gestures mapped onto layout and selection state.

use log::debug;

use crate::error::GraphError;
use crate::layout::{LayoutEngine, Viewport};

#[derive(Clone, Debug, PartialEq)]
struct DragState {
	index: usize,
	start_x: f64,
	start_y: f64,
	moved: bool,
}

/// Drag and click handling for one graph.
///
/// A press on a node starts a drag immediately; releasing it without moving
/// past the click distance counts as a click, which toggles selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionController {
	drag: Option<DragState>,
	selected: Option<String>,
}

impl InteractionController {
	/// A controller with nothing dragged or selected.
	pub fn new() -> Self {
		Self::default()
	}

	/// Currently selected node id.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Index of the node being dragged.
	pub fn dragging(&self) -> Option<usize> {
		self.drag.as_ref().map(|d| d.index)
	}

	/// Top-most node whose drawn circle contains `(x, y)`.
	pub fn node_at(engine: &LayoutEngine, x: f64, y: f64) -> Option<usize> {
		let config = engine.config();
		engine.nodes().iter().rposition(|node| {
			let r = config.display_radius(node.value);
			(node.x - x).powi(2) + (node.y - y).powi(2) <= r * r
		})
	}

	/// Press: start dragging the node under the pointer, if any.
	pub fn pointer_down(
		&mut self,
		engine: &mut LayoutEngine,
		x: f64,
		y: f64,
	) -> Result<Option<usize>, GraphError> {
		let Some(index) = Self::node_at(engine, x, y) else {
			return Ok(None);
		};
		self.drag_start(engine, index, x, y)?;
		Ok(Some(index))
	}

	/// Reheat the layout and pin `index` to the pointer.
	pub fn drag_start(
		&mut self,
		engine: &mut LayoutEngine,
		index: usize,
		x: f64,
		y: f64,
	) -> Result<(), GraphError> {
		let target = engine.config().drag_alpha_target;
		engine.set_alpha_target(target)?;
		engine.restart()?;
		let (px, py) = engine.clamp_to_viewport(x, y);
		engine.pin(index, px, py)?;
		self.drag = Some(DragState {
			index,
			start_x: x,
			start_y: y,
			moved: false,
		});
		Ok(())
	}

	/// Move: the pinned node follows the pointer, kept inside the viewport.
	pub fn pointer_move(
		&mut self,
		engine: &mut LayoutEngine,
		x: f64,
		y: f64,
	) -> Result<(), GraphError> {
		let Some(drag) = self.drag.as_mut() else {
			return Ok(());
		};
		let travel = ((x - drag.start_x).powi(2) + (y - drag.start_y).powi(2)).sqrt();
		if travel > engine.config().click_distance {
			drag.moved = true;
		}
		let (px, py) = engine.clamp_to_viewport(x, y);
		engine.pin(drag.index, px, py)
	}

	/// Release: unpin and let the layout cool. Returns true when the press was
	/// a click that changed the selection.
	pub fn pointer_up(&mut self, engine: &mut LayoutEngine) -> Result<bool, GraphError> {
		let Some(drag) = self.end_drag(engine)? else {
			return Ok(false);
		};
		if drag.moved {
			return Ok(false);
		}
		let id = engine
			.ids()
			.get(drag.index)
			.cloned()
			.ok_or(GraphError::UnknownNode(drag.index))?;
		self.click(&id);
		Ok(true)
	}

	/// Pointer left the surface: end any drag without clicking.
	pub fn pointer_leave(&mut self, engine: &mut LayoutEngine) -> Result<(), GraphError> {
		self.end_drag(engine).map(|_| ())
	}

	fn end_drag(&mut self, engine: &mut LayoutEngine) -> Result<Option<DragState>, GraphError> {
		let Some(drag) = self.drag.take() else {
			return Ok(None);
		};
		engine.set_alpha_target(0.0)?;
		engine.unpin(drag.index)?;
		Ok(Some(drag))
	}

	/// Toggle selection of `id`. Returns the new selection.
	pub fn click(&mut self, id: &str) -> Option<&str> {
		if self.selected.as_deref() == Some(id) {
			self.selected = None;
		} else {
			self.selected = Some(id.to_owned());
		}
		debug!("selection is now {:?}", self.selected);
		self.selected()
	}

	/// Drop the selection.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Adopt a selection made outside the canvas.
	pub fn select(&mut self, id: Option<String>) {
		self.selected = id;
	}

	/// New viewport size: recenter and reheat gently.
	pub fn resize(
		&mut self,
		engine: &mut LayoutEngine,
		width: f64,
		height: f64,
	) -> Result<(), GraphError> {
		engine.resize(Viewport::new(width, height))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Character, Relationship, build_graph};
	use crate::layout::{LayoutConfig, SimulationStatus};

	fn engine() -> LayoutEngine {
		let characters: Vec<_> = ["A", "B", "C"]
			.iter()
			.map(|n| Character {
				name: n.to_string(),
				mentions: 9,
				..Default::default()
			})
			.collect();
		let relationships = vec![Relationship {
			source: "A".into(),
			target: "B".into(),
			strength: 3.0,
			..Default::default()
		}];
		let graph = build_graph(&characters, &relationships);
		LayoutEngine::new(&graph, Viewport::new(800.0, 600.0), LayoutConfig::default())
	}

	fn settle(engine: &mut LayoutEngine) {
		while engine.tick() {}
	}

	fn position(engine: &LayoutEngine, index: usize) -> (f64, f64) {
		(engine.nodes()[index].x, engine.nodes()[index].y)
	}

	#[test]
	fn drag_pins_to_pointer_and_releases() {
		let mut e = engine();
		settle(&mut e);
		let mut c = InteractionController::new();
		let (x, y) = position(&e, 1);

		assert_eq!(c.pointer_down(&mut e, x, y).unwrap(), Some(1));
		assert_eq!(e.status(), SimulationStatus::Running);
		assert_eq!(e.alpha_target(), 0.3);

		for (px, py) in [(200.0, 200.0), (250.0, 260.0), (400.0, 100.0)] {
			c.pointer_move(&mut e, px, py).unwrap();
			e.tick();
			assert_eq!(position(&e, 1), (px, py));
		}

		assert!(!c.pointer_up(&mut e).unwrap());
		assert!(!e.nodes()[1].is_pinned());
		assert_eq!(e.alpha_target(), 0.0);
		assert_eq!(c.selected(), None);

		e.tick();
		assert_ne!(position(&e, 1), (400.0, 100.0));
	}

	#[test]
	fn drag_outside_viewport_is_clamped() {
		let mut e = engine();
		settle(&mut e);
		let mut c = InteractionController::new();
		let (x, y) = position(&e, 0);
		c.pointer_down(&mut e, x, y).unwrap();
		c.pointer_move(&mut e, -100.0, 9000.0).unwrap();
		e.tick();
		assert_eq!(position(&e, 0), (30.0, 570.0));
	}

	#[test]
	fn press_and_release_in_place_toggles_selection() {
		let mut e = engine();
		settle(&mut e);
		let mut c = InteractionController::new();
		let (x, y) = position(&e, 2);

		c.pointer_down(&mut e, x, y).unwrap();
		assert!(c.pointer_up(&mut e).unwrap());
		assert_eq!(c.selected(), Some("C"));

		c.pointer_down(&mut e, x + 1.0, y).unwrap();
		assert!(c.pointer_up(&mut e).unwrap());
		assert_eq!(c.selected(), None);
	}

	#[test]
	fn clicking_another_node_moves_selection() {
		let mut c = InteractionController::new();
		assert_eq!(c.click("A"), Some("A"));
		assert_eq!(c.click("B"), Some("B"));
		assert_eq!(c.click("B"), None);
		c.click("C");
		c.clear_selection();
		assert_eq!(c.selected(), None);
		c.select(Some("A".into()));
		assert_eq!(c.click("A"), None);
	}

	#[test]
	fn press_on_empty_space_does_nothing() {
		let mut e = engine();
		settle(&mut e);
		let mut c = InteractionController::new();
		assert_eq!(c.pointer_down(&mut e, -500.0, -500.0).unwrap(), None);
		assert_eq!(e.status(), SimulationStatus::Idle);
		assert!(!c.pointer_up(&mut e).unwrap());
	}

	#[test]
	fn leaving_the_surface_ends_the_drag() {
		let mut e = engine();
		let mut c = InteractionController::new();
		let (x, y) = position(&e, 0);
		c.pointer_down(&mut e, x, y).unwrap();
		assert!(c.dragging().is_some());
		c.pointer_leave(&mut e).unwrap();
		assert!(c.dragging().is_none());
		assert!(!e.nodes()[0].is_pinned());
		assert_eq!(c.selected(), None);
	}

	#[test]
	fn resize_recenters() {
		let mut e = engine();
		let mut c = InteractionController::new();
		c.resize(&mut e, 1000.0, 500.0).unwrap();
		assert_eq!(e.viewport(), Viewport::new(1000.0, 500.0));
		assert_eq!((e.center_force().x, e.center_force().y), (500.0, 250.0));
	}
}
