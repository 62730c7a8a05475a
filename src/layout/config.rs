//! Physics and sizing constants.

use serde::Deserialize;

/// Tunables for the force simulation and node sizing.
///
/// Deserializes with every field optional; missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
	/// Rest length of a link.
	pub link_distance: f64,
	/// Link stiffness in `[0, 1]`.
	pub link_strength: f64,
	/// Per-node charge; negative repels.
	pub charge_strength: f64,
	/// Barnes–Hut accuracy; larger is coarser.
	pub theta: f64,
	/// Charge distances below this are clamped.
	pub distance_min: f64,
	/// Charge is ignored beyond this distance.
	pub distance_max: f64,
	/// Strength of the initial centering force.
	pub center_strength: f64,
	/// Strength of the centering force installed on resize.
	pub resize_center_strength: f64,
	/// Collision stiffness in `[0, 1]`.
	pub collide_strength: f64,
	/// Multiplier on `sqrt(value)` for both radii.
	pub radius_scale: f64,
	/// Added to the scaled radius for collision.
	pub collide_padding: f64,
	/// Added to the scaled radius for drawing.
	pub display_padding: f64,
	/// Distance kept between nodes and the viewport edge.
	pub boundary_padding: f64,
	/// Starting energy.
	pub alpha: f64,
	/// The simulation idles once alpha drops below this.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed every tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost every tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha set when the viewport is resized.
	pub resize_alpha: f64,
	/// Pointer travel that turns a press into a drag instead of a click.
	pub click_distance: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			link_strength: 0.8,
			charge_strength: -300.0,
			theta: 0.9,
			distance_min: 1.0,
			distance_max: f64::INFINITY,
			center_strength: 1.0,
			resize_center_strength: 0.1,
			collide_strength: 1.0,
			radius_scale: 2.0,
			collide_padding: 12.0,
			display_padding: 6.0,
			boundary_padding: 30.0,
			alpha: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
			click_distance: 3.0,
		}
	}
}

impl LayoutConfig {
	/// Radius a node is drawn with.
	pub fn display_radius(&self, value: f64) -> f64 {
		value.sqrt() * self.radius_scale + self.display_padding
	}

	/// Exclusion radius used by the collision force.
	pub fn collide_radius(&self, value: f64) -> f64 {
		value.sqrt() * self.radius_scale + self.collide_padding
	}
}

/// Size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Viewport {
	/// A viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Center point.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Clamp a point into `[padding, dimension - padding]` on both axes.
	///
	/// When the viewport is narrower than twice the padding the point lands on
	/// the padding line.
	pub fn clamp(&self, x: f64, y: f64, padding: f64) -> (f64, f64) {
		(
			padding.max(x.min(self.width - padding)),
			padding.max(y.min(self.height - padding)),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config: LayoutConfig =
			serde_json::from_str(r#"{"linkDistance": 60, "boundaryPadding": 10}"#).unwrap();
		assert_eq!(config.link_distance, 60.0);
		assert_eq!(config.boundary_padding, 10.0);
		assert_eq!(config.charge_strength, -300.0);
	}

	#[test]
	fn alpha_decays_to_min_in_about_300_ticks() {
		let config = LayoutConfig::default();
		let mut alpha = config.alpha;
		for _ in 0..300 {
			alpha += (0.0 - alpha) * config.alpha_decay;
		}
		assert!((alpha - config.alpha_min).abs() < 1e-9);
	}

	#[test]
	fn radii_grow_with_value() {
		let config = LayoutConfig::default();
		assert_eq!(config.display_radius(1.0), 8.0);
		assert_eq!(config.collide_radius(16.0), 20.0);
	}

	#[test]
	fn clamp_handles_tiny_viewports() {
		let v = Viewport::new(40.0, 200.0);
		assert_eq!(v.clamp(-5.0, 500.0, 30.0), (30.0, 170.0));
	}
}
