//! Force-directed layout: a Barnes–Hut charge, springs, centering and
//! collision, integrated one explicit step at a time.

mod config;
mod engine;
mod forces;
mod quadtree;

pub use config::{LayoutConfig, Viewport};
pub use engine::{LayoutEngine, LayoutState, Physics, SimulationStatus, step};
pub use forces::{CenterForce, CollideForce, ForceSet, Jiggle, LinkForce, ManyBodyForce, SimNode};
pub use quadtree::{Quad, QuadTree};
