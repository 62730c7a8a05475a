use crate::error::GraphError;
use crate::graph::{GraphData, Highlight};
use crate::interaction::InteractionController;
use crate::layout::{LayoutConfig, LayoutEngine, Viewport};
use crate::scene::Scene;

/// Everything the canvas loop owns for the graph currently on screen.
pub struct NetworkGraphState {
	pub graph: GraphData,
	pub engine: LayoutEngine,
	pub controller: InteractionController,
	pub highlight: Highlight,
	render_failed: bool,
}

impl NetworkGraphState {
	pub fn new(
		graph: GraphData,
		viewport: Viewport,
		config: LayoutConfig,
		selected: Option<String>,
		highlight: Highlight,
	) -> Self {
		let engine = LayoutEngine::new(&graph, viewport, config);
		let mut controller = InteractionController::new();
		controller.select(selected);
		Self {
			graph,
			engine,
			controller,
			highlight,
			render_failed: false,
		}
	}

	/// Advance the layout one step if it is running, then compose the frame.
	pub fn frame(&mut self) -> Scene {
		self.engine.tick();
		Scene::compose(
			&self.graph,
			&self.engine,
			&self.highlight,
			self.controller.selected(),
		)
	}

	/// Step, compose and hand the frame to `draw`.
	///
	/// Only the first failure is reported; drawing then stops until a new graph
	/// replaces this state.
	pub fn render_frame(
		&mut self,
		draw: impl FnOnce(&Scene, Viewport) -> Result<(), GraphError>,
	) -> Result<(), GraphError> {
		if self.render_failed {
			return Ok(());
		}
		let scene = self.frame();
		draw(&scene, self.engine.viewport()).inspect_err(|_| self.render_failed = true)
	}

	pub fn resize(&mut self, width: f64, height: f64) -> Result<(), GraphError> {
		if self.engine.viewport() == Viewport::new(width, height) {
			return Ok(());
		}
		self.controller.resize(&mut self.engine, width, height)
	}

	/// Stop the current layout for good before a new graph replaces it.
	pub fn teardown(&mut self) {
		self.engine.teardown();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Character, build_graph};
	use crate::layout::SimulationStatus;

	fn state() -> NetworkGraphState {
		let characters: Vec<_> = ["A", "B"]
			.iter()
			.map(|n| Character {
				name: n.to_string(),
				..Default::default()
			})
			.collect();
		NetworkGraphState::new(
			build_graph(&characters, &[]),
			Viewport::new(400.0, 300.0),
			LayoutConfig::default(),
			Some("B".into()),
			Highlight::All,
		)
	}

	#[test]
	fn frames_reflect_the_latest_step() {
		let mut s = state();
		let scene = s.frame();
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.nodes[0].x, s.engine.nodes()[0].x);
		assert_eq!(scene.nodes[1].stroke_width, 3.0);
	}

	#[test]
	fn render_failure_is_reported_once_and_cleared_by_a_new_graph() {
		let mut s = state();
		let fail = |_: &Scene, _: Viewport| Err(GraphError::Render("lost context".into()));
		assert_eq!(s.render_frame(fail), Err(GraphError::Render("lost context".into())));

		let mut drawn = 0;
		s.render_frame(|_, _| {
			drawn += 1;
			Ok(())
		})
		.unwrap();
		assert_eq!(drawn, 0);

		let mut replacement = state();
		replacement
			.render_frame(|scene, viewport| {
				drawn += scene.nodes.len();
				assert_eq!(viewport, Viewport::new(400.0, 300.0));
				Ok(())
			})
			.unwrap();
		assert_eq!(drawn, 2);
	}

	#[test]
	fn repeated_resize_to_same_size_does_not_reheat() {
		let mut s = state();
		while s.engine.tick() {}
		s.resize(400.0, 300.0).unwrap();
		assert_eq!(s.engine.status(), SimulationStatus::Idle);
		s.resize(500.0, 300.0).unwrap();
		assert_eq!(s.engine.status(), SimulationStatus::Running);
	}

	#[test]
	fn torn_down_state_refuses_resize() {
		let mut s = state();
		s.teardown();
		assert_eq!(s.resize(10.0, 10.0), Err(GraphError::EngineStopped));
		assert_eq!(s.frame().nodes.len(), 2);
	}
}
