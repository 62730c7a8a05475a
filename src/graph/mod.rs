//! Graph data model, construction and highlighting.

mod builder;
mod connections;
mod highlight;
mod pairs;
mod types;

pub use builder::{build_from_input, build_graph, build_graph_from_json};
pub use connections::{Connections, Direction, simplified_type};
pub use highlight::{Highlight, LINK_DIMMED, LINK_OPACITY, NODE_DIMMED, NODE_OPACITY};
pub use pairs::{RelationshipPair, StrengthTier, pair_relationships};
pub use types::{
	AnalysisInput, AnalysisMeta, Character, GraphData, Importance, Link, Node, PairKey,
	Relationship,
};
