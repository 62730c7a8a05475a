//! The four forces of the layout.
//!
//! Link, charge and collision forces write velocities; the centering force
//! translates positions directly. All of them read the positions left by the
//! previous tick.

use std::collections::HashMap;

use super::quadtree::QuadTree;
use crate::error::GraphError;
use crate::graph::Link;

/// A node as the simulation sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	/// Position x.
	pub x: f64,
	/// Position y.
	pub y: f64,
	/// Velocity x.
	pub vx: f64,
	/// Velocity y.
	pub vy: f64,
	/// Pinned x, overriding physics while set.
	pub fx: Option<f64>,
	/// Pinned y, overriding physics while set.
	pub fy: Option<f64>,
	/// Size-driving value.
	pub value: f64,
	/// Collision radius.
	pub radius: f64,
}

impl SimNode {
	/// A resting node at `(x, y)`.
	pub fn new(x: f64, y: f64, value: f64, radius: f64) -> Self {
		Self {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
			value,
			radius,
		}
	}

	/// Whether the node is pinned on either axis.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Deterministic source of tiny offsets that separate coincident nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Jiggle(u32);

impl Default for Jiggle {
	fn default() -> Self {
		Self(1)
	}
}

impl Jiggle {
	/// Next offset in `(-5e-7, 5e-7)`.
	pub fn sample(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		(self.0 as f64 / 4_294_967_296.0 - 0.5) * 1e-6
	}

	fn or_nonzero(&mut self, v: f64) -> f64 {
		if v == 0.0 { self.sample() } else { v }
	}
}

#[derive(Clone, Debug, PartialEq)]
struct Spring {
	source: usize,
	target: usize,
	bias: f64,
}

/// Springs pulling linked nodes toward a rest distance.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkForce {
	springs: Vec<Spring>,
	distance: f64,
	strength: f64,
}

impl LinkForce {
	/// Resolve every link endpoint against `ids`. Self-loops exert no force and
	/// are skipped.
	pub fn new(
		ids: &[String],
		links: &[Link],
		distance: f64,
		strength: f64,
	) -> Result<Self, GraphError> {
		let index: HashMap<&str, usize> =
			ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
		let mut degree = vec![0usize; ids.len()];
		let mut ends = Vec::with_capacity(links.len());
		for link in links {
			let (Some(&s), Some(&t)) =
				(index.get(link.source.as_str()), index.get(link.target.as_str()))
			else {
				return Err(GraphError::UnresolvedLink {
					from: link.source.clone(),
					to: link.target.clone(),
				});
			};
			if s == t {
				continue;
			}
			degree[s] += 1;
			degree[t] += 1;
			ends.push((s, t));
		}

		// The better-connected end moves less.
		let springs = ends
			.into_iter()
			.map(|(source, target)| Spring {
				source,
				target,
				bias: degree[source] as f64 / (degree[source] + degree[target]) as f64,
			})
			.collect();
		Ok(Self {
			springs,
			distance,
			strength,
		})
	}

	/// Number of springs.
	pub fn len(&self) -> usize {
		self.springs.len()
	}

	/// Whether there are no springs.
	pub fn is_empty(&self) -> bool {
		self.springs.is_empty()
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, jiggle: &mut Jiggle) {
		for spring in &self.springs {
			let (s, t) = (&nodes[spring.source], &nodes[spring.target]);
			let mut x = jiggle.or_nonzero(t.x + t.vx - s.x - s.vx);
			let mut y = jiggle.or_nonzero(t.y + t.vy - s.y - s.vy);
			let l = (x * x + y * y).sqrt();
			let l = (l - self.distance) / l * alpha * self.strength;
			x *= l;
			y *= l;

			let target = &mut nodes[spring.target];
			target.vx -= x * spring.bias;
			target.vy -= y * spring.bias;
			let source = &mut nodes[spring.source];
			source.vx += x * (1.0 - spring.bias);
			source.vy += y * (1.0 - spring.bias);
		}
	}
}

/// All-pairs charge, approximated with a Barnes–Hut quadtree.
#[derive(Clone, Debug, PartialEq)]
pub struct ManyBodyForce {
	/// Per-node charge; negative repels.
	pub strength: f64,
	theta2: f64,
	distance_min2: f64,
	distance_max2: f64,
}

impl ManyBodyForce {
	/// A charge force with the given accuracy and distance window.
	pub fn new(strength: f64, theta: f64, distance_min: f64, distance_max: f64) -> Self {
		Self {
			strength,
			theta2: theta * theta,
			distance_min2: distance_min * distance_min,
			distance_max2: distance_max * distance_max,
		}
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, jiggle: &mut Jiggle) {
		let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
		let mut tree = QuadTree::build(&points);
		tree.accumulate_weights(&points, |_| self.strength);

		for (i, node) in nodes.iter_mut().enumerate() {
			let (xi, yi) = points[i];
			let (mut dvx, mut dvy) = (0.0, 0.0);
			tree.visit(|quad| {
				if quad.weight == 0.0 {
					return true;
				}
				let mut x = quad.cx - xi;
				let mut y = quad.cy - yi;
				let mut l = x * x + y * y;

				// Far enough away: treat the whole quad as one body.
				if quad.size * quad.size / self.theta2 < l {
					if l < self.distance_max2 {
						if x == 0.0 {
							x = jiggle.sample();
							l += x * x;
						}
						if y == 0.0 {
							y = jiggle.sample();
							l += y * y;
						}
						if l < self.distance_min2 {
							l = (self.distance_min2 * l).sqrt();
						}
						dvx += x * quad.weight * alpha / l;
						dvy += y * quad.weight * alpha / l;
					}
					return true;
				}
				if !quad.is_leaf() {
					return false;
				}
				if l >= self.distance_max2 {
					return true;
				}

				for &j in quad.points() {
					if j == i {
						continue;
					}
					let mut x = points[j].0 - xi;
					let mut y = points[j].1 - yi;
					let mut l = x * x + y * y;
					if x == 0.0 {
						x = jiggle.sample();
						l += x * x;
					}
					if y == 0.0 {
						y = jiggle.sample();
						l += y * y;
					}
					if l < self.distance_min2 {
						l = (self.distance_min2 * l).sqrt();
					}
					let w = self.strength * alpha / l;
					dvx += x * w;
					dvy += y * w;
				}
				true
			});
			node.vx += dvx;
			node.vy += dvy;
		}
	}
}

/// Pull toward a target point by translating the whole graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterForce {
	/// Target x.
	pub x: f64,
	/// Target y.
	pub y: f64,
	/// Fraction of the offset corrected per tick.
	pub strength: f64,
}

impl CenterForce {
	fn apply(&self, nodes: &mut [SimNode]) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes.iter().fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let dx = (sx / n - self.x) * self.strength;
		let dy = (sy / n - self.y) * self.strength;
		for node in nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

/// Keep nodes from overlapping their collision radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollideForce {
	/// Fraction of the overlap resolved per tick.
	pub strength: f64,
}

impl CollideForce {
	fn apply(&self, nodes: &mut [SimNode], jiggle: &mut Jiggle) {
		let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x + n.vx, n.y + n.vy)).collect();
		let radii: Vec<f64> = nodes.iter().map(|n| n.radius).collect();
		let mut tree = QuadTree::build(&points);
		tree.accumulate_radii(|i| radii[i]);

		for i in 0..nodes.len() {
			let (xi, yi) = points[i];
			let ri = radii[i];
			let ri2 = ri * ri;
			tree.visit(|quad| {
				if quad.is_leaf() {
					for &j in quad.points() {
						if j <= i {
							continue;
						}
						let rj = radii[j];
						let r = ri + rj;
						let other = &nodes[j];
						let mut x = xi - other.x - other.vx;
						let mut y = yi - other.y - other.vy;
						let mut l = x * x + y * y;
						if l >= r * r {
							continue;
						}
						if x == 0.0 {
							x = jiggle.sample();
							l += x * x;
						}
						if y == 0.0 {
							y = jiggle.sample();
							l += y * y;
						}
						let d = l.sqrt();
						let push = (r - d) / d * self.strength;
						x *= push;
						y *= push;
						let share = (rj * rj) / (ri2 + rj * rj);

						nodes[i].vx += x * share;
						nodes[i].vy += y * share;
						nodes[j].vx -= x * (1.0 - share);
						nodes[j].vy -= y * (1.0 - share);
					}
					return true;
				}
				let r = ri + quad.radius;
				quad.x0 > xi + r
					|| quad.x0 + quad.size < xi - r
					|| quad.y0 > yi + r
					|| quad.y0 + quad.size < yi - r
			});
		}
	}
}

/// The forces applied every tick, in order: link, charge, center, collision.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceSet {
	/// Absent when the link list could not be resolved.
	pub link: Option<LinkForce>,
	/// Repulsion.
	pub charge: ManyBodyForce,
	/// Centering. Replaced, never stacked, on resize.
	pub center: CenterForce,
	/// Collision.
	pub collide: CollideForce,
}

impl ForceSet {
	/// Apply every force for one tick.
	pub fn apply(&self, nodes: &mut [SimNode], alpha: f64, jiggle: &mut Jiggle) {
		if let Some(link) = &self.link {
			link.apply(nodes, alpha, jiggle);
		}
		self.charge.apply(nodes, alpha, jiggle);
		self.center.apply(nodes);
		self.collide.apply(nodes, jiggle);
	}
}
