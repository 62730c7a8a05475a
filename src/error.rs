//! Error type shared by graph construction, layout and interaction.

use thiserror::Error;

/// Errors raised by the graph core.
///
/// None of these are fatal to the view: callers log them and degrade to a
/// partial or empty graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
	/// The analysis payload is not an object, or a record list is not an array.
	#[error("malformed analysis input: {0}")]
	MalformedInput(String),

	/// A relationship names a character that is not in the character list.
	#[error("relationship {from} -> {to} references unknown character `{missing}`")]
	DanglingEndpoint {
		/// Source character of the relationship.
		from: String,
		/// Target character of the relationship.
		to: String,
		/// The endpoint that could not be found.
		missing: String,
	},

	/// A link endpoint does not resolve to a node held by the layout.
	#[error("link {from} -> {to} does not resolve to a layout node")]
	UnresolvedLink {
		/// Source node id of the link.
		from: String,
		/// Target node id of the link.
		to: String,
	},

	/// A node index outside the engine's node list.
	#[error("node index {0} is out of range")]
	UnknownNode(usize),

	/// The layout engine was torn down and cannot be reused.
	#[error("layout engine has been torn down")]
	EngineStopped,

	/// Drawing to the canvas failed.
	#[error("render failed: {0}")]
	Render(String),
}
