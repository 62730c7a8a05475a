//! Point quadtree used to approximate many-body and collision forces.
//!
//! Quads live in one arena. Children are always pushed after their parent, so
//! walking the arena backwards visits every child before its parent.

/// Coincident points and very deep splits share a leaf bucket below this depth.
const MAX_DEPTH: usize = 32;

/// A square cell of the tree.
#[derive(Clone, Debug)]
pub struct Quad {
	/// Left edge.
	pub x0: f64,
	/// Top edge.
	pub y0: f64,
	/// Side length.
	pub size: f64,
	children: Option<[usize; 4]>,
	points: Vec<usize>,
	/// Sum of point weights below this quad.
	pub weight: f64,
	/// Weighted centroid x.
	pub cx: f64,
	/// Weighted centroid y.
	pub cy: f64,
	/// Largest point radius below this quad.
	pub radius: f64,
}

impl Quad {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			children: None,
			points: Vec::new(),
			weight: 0.0,
			cx: 0.0,
			cy: 0.0,
			radius: 0.0,
		}
	}

	/// Point indices held directly by this quad. Empty for internal quads.
	pub fn points(&self) -> &[usize] {
		&self.points
	}

	/// Whether this quad has no children.
	pub fn is_leaf(&self) -> bool {
		self.children.is_none()
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		(x >= self.x0 + half) as usize | ((y >= self.y0 + half) as usize) << 1
	}
}

/// Quadtree over a fixed set of points.
#[derive(Clone, Debug)]
pub struct QuadTree {
	quads: Vec<Quad>,
}

impl QuadTree {
	/// Build a tree covering `points`.
	pub fn build(points: &[(f64, f64)]) -> Self {
		let finite = points.iter().filter(|(x, y)| x.is_finite() && y.is_finite());
		let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
		for &(x, y) in finite {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		if x0 > x1 {
			(x0, y0, x1, y1) = (0.0, 0.0, 1.0, 1.0);
		}
		let size = (x1 - x0).max(y1 - y0).max(1.0);

		let mut tree = Self {
			quads: vec![Quad::new(x0, y0, size)],
		};
		for index in 0..points.len() {
			tree.insert(index, points);
		}
		tree
	}

	fn insert(&mut self, index: usize, points: &[(f64, f64)]) {
		let (x, y) = points[index];
		let (mut q, mut depth) = (0, 0);
		loop {
			if let Some(children) = self.quads[q].children {
				q = children[self.quads[q].quadrant(x, y)];
				depth += 1;
				continue;
			}
			let shares_leaf = match self.quads[q].points.first() {
				None => true,
				Some(&other) => points[other] == (x, y),
			};
			if shares_leaf || depth >= MAX_DEPTH {
				self.quads[q].points.push(index);
				return;
			}
			self.subdivide(q, points);
		}
	}

	fn subdivide(&mut self, q: usize, points: &[(f64, f64)]) {
		let (x0, y0, half) = (self.quads[q].x0, self.quads[q].y0, self.quads[q].size / 2.0);
		let first = self.quads.len();
		for k in 0..4 {
			let dx = if k & 1 == 1 { half } else { 0.0 };
			let dy = if k & 2 == 2 { half } else { 0.0 };
			self.quads.push(Quad::new(x0 + dx, y0 + dy, half));
		}
		let children = [first, first + 1, first + 2, first + 3];
		for index in std::mem::take(&mut self.quads[q].points) {
			let (px, py) = points[index];
			let child = children[self.quads[q].quadrant(px, py)];
			self.quads[child].points.push(index);
		}
		self.quads[q].children = Some(children);
	}

	/// Aggregate point weights bottom-up. Centroids are weighted by `|weight|`.
	pub fn accumulate_weights(&mut self, points: &[(f64, f64)], weight: impl Fn(usize) -> f64) {
		for q in (0..self.quads.len()).rev() {
			let (mut total, mut norm, mut cx, mut cy) = (0.0, 0.0, 0.0, 0.0);
			match self.quads[q].children {
				Some(children) => {
					for c in children {
						let child = &self.quads[c];
						let w = child.weight.abs();
						total += child.weight;
						norm += w;
						cx += w * child.cx;
						cy += w * child.cy;
					}
				}
				None => {
					for &i in &self.quads[q].points {
						let w = weight(i);
						total += w;
						norm += w.abs();
						cx += w.abs() * points[i].0;
						cy += w.abs() * points[i].1;
					}
				}
			}
			let quad = &mut self.quads[q];
			quad.weight = total;
			if norm > 0.0 {
				quad.cx = cx / norm;
				quad.cy = cy / norm;
			}
		}
	}

	/// Aggregate the largest point radius bottom-up.
	pub fn accumulate_radii(&mut self, radius: impl Fn(usize) -> f64) {
		for q in (0..self.quads.len()).rev() {
			let r = match self.quads[q].children {
				Some(children) => children
					.iter()
					.map(|&c| self.quads[c].radius)
					.fold(0.0, f64::max),
				None => self.quads[q].points.iter().map(|&i| radius(i)).fold(0.0, f64::max),
			};
			self.quads[q].radius = r;
		}
	}

	/// Pre-order walk. Returning `true` from `visit` skips that quad's children.
	pub fn visit(&self, mut visit: impl FnMut(&Quad) -> bool) {
		let mut stack = vec![0];
		while let Some(q) = stack.pop() {
			let quad = &self.quads[q];
			if visit(quad) {
				continue;
			}
			if let Some(children) = quad.children {
				stack.extend(children.iter().rev());
			}
		}
	}

	/// Number of quads, internal and leaf.
	pub fn len(&self) -> usize {
		self.quads.len()
	}

	/// Always false: the root quad exists even for zero points.
	pub fn is_empty(&self) -> bool {
		self.quads.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaves(tree: &QuadTree) -> Vec<Vec<usize>> {
		let mut out = Vec::new();
		tree.visit(|q| {
			if q.is_leaf() && !q.points().is_empty() {
				out.push(q.points().to_vec());
			}
			false
		});
		out
	}

	#[test]
	fn distinct_points_get_their_own_leaves() {
		let points = [(0.0, 0.0), (10.0, 0.0), (0.0, 10.0), (10.0, 10.0), (2.0, 2.0)];
		let tree = QuadTree::build(&points);
		let leaves = leaves(&tree);
		assert_eq!(leaves.len(), points.len());
		assert!(leaves.iter().all(|l| l.len() == 1));
	}

	#[test]
	fn coincident_points_share_a_bucket() {
		let points = [(5.0, 5.0), (5.0, 5.0), (9.0, 1.0)];
		let tree = QuadTree::build(&points);
		let mut leaves = leaves(&tree);
		leaves.sort();
		assert_eq!(leaves, vec![vec![0, 1], vec![2]]);
	}

	#[test]
	fn root_aggregates_weight_and_centroid() {
		let points = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
		let mut tree = QuadTree::build(&points);
		tree.accumulate_weights(&points, |_| -2.0);
		let mut root = None;
		tree.visit(|q| {
			root.get_or_insert((q.weight, q.cx, q.cy));
			true
		});
		let (w, cx, cy) = root.unwrap();
		assert_eq!(w, -8.0);
		assert!((cx - 5.0).abs() < 1e-9);
		assert!((cy - 5.0).abs() < 1e-9);
	}

	#[test]
	fn radii_take_the_maximum() {
		let points = [(0.0, 0.0), (100.0, 100.0)];
		let mut tree = QuadTree::build(&points);
		tree.accumulate_radii(|i| [3.0, 7.0][i]);
		let mut root_radius = 0.0;
		tree.visit(|q| {
			root_radius = q.radius;
			true
		});
		assert_eq!(root_radius, 7.0);
	}

	#[test]
	fn non_finite_points_do_not_loop_forever() {
		let points = [(f64::NAN, 0.0), (f64::NAN, 0.0), (1.0, 1.0)];
		let tree = QuadTree::build(&points);
		assert!(tree.len() > 1);
		let total: usize = leaves(&tree).iter().map(Vec::len).sum();
		assert_eq!(total, 3);
	}
}
