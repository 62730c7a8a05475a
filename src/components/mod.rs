pub mod network_graph;
pub mod relationship_panel;
