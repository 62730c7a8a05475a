mod component;
mod details;
mod render;
mod state;

pub use component::NetworkGraph;
