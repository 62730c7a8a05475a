//! One explicit integration step, and the engine that drives it.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, warn};

use super::config::{LayoutConfig, Viewport};
use super::forces::{CenterForce, CollideForce, ForceSet, Jiggle, LinkForce, ManyBodyForce, SimNode};
use crate::error::GraphError;
use crate::graph::GraphData;

/// Mutable simulation state: node kinematics and energy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutState {
	/// Nodes in graph order.
	pub nodes: Vec<SimNode>,
	/// Current energy.
	pub alpha: f64,
	/// Energy the simulation decays toward.
	pub alpha_target: f64,
	jiggle: Jiggle,
}

/// Everything a step needs besides the state itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Physics {
	/// Forces in application order.
	pub forces: ForceSet,
	/// Fraction of the gap to `alpha_target` closed every step.
	pub alpha_decay: f64,
	/// Fraction of velocity lost every step.
	pub velocity_decay: f64,
	/// Viewport positions are clamped into.
	pub viewport: Viewport,
	/// Distance kept from the viewport edge.
	pub padding: f64,
}

/// Advance the layout by one tick.
///
/// Decays alpha, applies every force, integrates velocities (pinned nodes
/// jump to their pin), then clamps every position into the padded viewport.
pub fn step(mut state: LayoutState, physics: &Physics) -> LayoutState {
	state.alpha += (state.alpha_target - state.alpha) * physics.alpha_decay;
	physics
		.forces
		.apply(&mut state.nodes, state.alpha, &mut state.jiggle);

	let keep = 1.0 - physics.velocity_decay;
	for node in &mut state.nodes {
		match node.fx {
			Some(fx) => {
				node.x = fx;
				node.vx = 0.0;
			}
			None => {
				node.vx *= keep;
				node.x += node.vx;
			}
		}
		match node.fy {
			Some(fy) => {
				node.y = fy;
				node.vy = 0.0;
			}
			None => {
				node.vy *= keep;
				node.y += node.vy;
			}
		}
		(node.x, node.y) = physics.viewport.clamp(node.x, node.y, physics.padding);
	}
	state
}

/// Lifecycle of a [`LayoutEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
	/// Settled; ticks are no-ops until reheated.
	Idle,
	/// Ticking every frame.
	Running,
	/// Torn down. Terminal.
	Stopped,
}

/// Stateful force layout over one graph.
///
/// A new graph needs a new engine; once torn down an engine refuses to run again.
#[derive(Clone, Debug)]
pub struct LayoutEngine {
	ids: Vec<String>,
	index: HashMap<String, usize>,
	state: LayoutState,
	physics: Physics,
	config: LayoutConfig,
	status: SimulationStatus,
	degraded: bool,
}

impl LayoutEngine {
	/// Seed nodes on a spiral around the viewport center and start running.
	///
	/// If the link list cannot be resolved the engine still runs, without the
	/// link force.
	pub fn new(graph: &GraphData, viewport: Viewport, config: LayoutConfig) -> Self {
		let ids: Vec<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
		// Reversed so the first of any repeated id wins.
		let index = ids.iter().enumerate().rev().map(|(i, id)| (id.clone(), i)).collect();
		let (cx, cy) = viewport.center();
		let angle_step = PI * (3.0 - 5f64.sqrt());
		let nodes = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * angle_step;
				let value = node.value as f64;
				SimNode::new(
					cx + radius * angle.cos(),
					cy + radius * angle.sin(),
					value,
					config.collide_radius(value),
				)
			})
			.collect();

		let link = LinkForce::new(&ids, &graph.links, config.link_distance, config.link_strength);
		let link = match link {
			Ok(force) => Some(force),
			Err(e) => {
				warn!("{e}; laying out without the link force");
				None
			}
		};
		let degraded = link.is_none();

		let physics = Physics {
			forces: ForceSet {
				link,
				charge: ManyBodyForce::new(
					config.charge_strength,
					config.theta,
					config.distance_min,
					config.distance_max,
				),
				center: CenterForce {
					x: cx,
					y: cy,
					strength: config.center_strength,
				},
				collide: CollideForce {
					strength: config.collide_strength,
				},
			},
			alpha_decay: config.alpha_decay,
			velocity_decay: config.velocity_decay,
			viewport,
			padding: config.boundary_padding,
		};

		debug!("layout engine started with {} nodes", ids.len());
		Self {
			ids,
			index,
			state: LayoutState {
				nodes,
				alpha: config.alpha,
				alpha_target: 0.0,
				jiggle: Jiggle::default(),
			},
			physics,
			config,
			status: SimulationStatus::Running,
			degraded,
		}
	}

	/// Run one step if running. Returns whether a step ran.
	///
	/// The engine goes idle once alpha falls below the configured minimum.
	pub fn tick(&mut self) -> bool {
		if self.status != SimulationStatus::Running {
			return false;
		}
		let state = std::mem::take(&mut self.state);
		self.state = step(state, &self.physics);
		if self.state.alpha < self.config.alpha_min {
			self.status = SimulationStatus::Idle;
			debug!("layout settled");
		}
		true
	}

	/// Current lifecycle status.
	pub fn status(&self) -> SimulationStatus {
		self.status
	}

	/// Whether the link force had to be dropped.
	pub fn is_degraded(&self) -> bool {
		self.degraded
	}

	/// Current energy.
	pub fn alpha(&self) -> f64 {
		self.state.alpha
	}

	/// Current alpha target.
	pub fn alpha_target(&self) -> f64 {
		self.state.alpha_target
	}

	/// Node kinematics in graph order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.state.nodes
	}

	/// Node ids in graph order.
	pub fn ids(&self) -> &[String] {
		&self.ids
	}

	/// Index of the node with `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Current viewport.
	pub fn viewport(&self) -> Viewport {
		self.physics.viewport
	}

	/// Configuration the engine was built with.
	pub fn config(&self) -> &LayoutConfig {
		&self.config
	}

	/// The active centering force.
	pub fn center_force(&self) -> CenterForce {
		self.physics.forces.center
	}

	/// Clamp a point the same way node positions are clamped.
	pub fn clamp_to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
		self.physics.viewport.clamp(x, y, self.physics.padding)
	}

	fn ensure_live(&self) -> Result<(), GraphError> {
		if self.status == SimulationStatus::Stopped {
			warn!("ignoring request on a torn-down layout engine");
			return Err(GraphError::EngineStopped);
		}
		Ok(())
	}

	/// Resume ticking without touching alpha.
	pub fn restart(&mut self) -> Result<(), GraphError> {
		self.ensure_live()?;
		self.status = SimulationStatus::Running;
		Ok(())
	}

	/// Set alpha and resume ticking.
	pub fn reheat(&mut self, alpha: f64) -> Result<(), GraphError> {
		self.ensure_live()?;
		self.state.alpha = alpha;
		self.restart()
	}

	/// Set the energy the simulation decays toward.
	pub fn set_alpha_target(&mut self, target: f64) -> Result<(), GraphError> {
		self.ensure_live()?;
		self.state.alpha_target = target;
		Ok(())
	}

	/// Fix a node at `(x, y)`; physics no longer moves it.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) -> Result<(), GraphError> {
		self.ensure_live()?;
		let node = self
			.state
			.nodes
			.get_mut(index)
			.ok_or(GraphError::UnknownNode(index))?;
		node.fx = Some(x);
		node.fy = Some(y);
		node.x = x;
		node.y = y;
		Ok(())
	}

	/// Hand a node back to physics.
	pub fn unpin(&mut self, index: usize) -> Result<(), GraphError> {
		self.ensure_live()?;
		let node = self
			.state
			.nodes
			.get_mut(index)
			.ok_or(GraphError::UnknownNode(index))?;
		node.fx = None;
		node.fy = None;
		Ok(())
	}

	/// Adopt a new viewport: replace the centering force with a gentler one
	/// aimed at the new center, then reheat at low intensity.
	pub fn resize(&mut self, viewport: Viewport) -> Result<(), GraphError> {
		self.ensure_live()?;
		let (x, y) = viewport.center();
		self.physics.viewport = viewport;
		self.physics.forces.center = CenterForce {
			x,
			y,
			strength: self.config.resize_center_strength,
		};
		debug!("layout resized to {}x{}", viewport.width, viewport.height);
		self.reheat(self.config.resize_alpha)
	}

	/// Stop ticking. The engine can be reheated later.
	pub fn stop(&mut self) {
		if self.status == SimulationStatus::Running {
			self.status = SimulationStatus::Idle;
		}
	}

	/// Stop for good.
	pub fn teardown(&mut self) {
		if self.status != SimulationStatus::Stopped {
			debug!("layout engine torn down");
		}
		self.status = SimulationStatus::Stopped;
	}
}
