//! Per-character relationship lists for the node detail panel.

use std::cmp::Ordering;

use super::types::Relationship;

/// Relationships touching one character, split by direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Connections<'a> {
	/// How the character views others, strongest first.
	pub outgoing: Vec<&'a Relationship>,
	/// How others view the character, strongest first. Self-loops are only outgoing.
	pub incoming: Vec<&'a Relationship>,
}

impl<'a> Connections<'a> {
	/// Collect the relationships of `id`.
	pub fn of(id: &str, relationships: &'a [Relationship]) -> Self {
		let mut outgoing: Vec<_> = relationships.iter().filter(|r| r.source == id).collect();
		let mut incoming: Vec<_> = relationships
			.iter()
			.filter(|r| r.target == id && r.source != id)
			.collect();
		outgoing.sort_by(|a, b| by_strength_desc(a, b));
		incoming.sort_by(|a, b| by_strength_desc(a, b));
		Self { outgoing, incoming }
	}
}

fn by_strength_desc(a: &Relationship, b: &Relationship) -> Ordering {
	b.strength.partial_cmp(&a.strength).unwrap_or(Ordering::Equal)
}

/// Which side of a relationship is being described.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// From the viewing character.
	Outgoing,
	/// From the viewed character.
	Incoming,
}

/// Types of the form `a-b` describe both sides; pick the half for `direction`.
pub fn simplified_type(kind: &str, direction: Direction) -> &str {
	match kind.split_once('-') {
		Some((out, inc)) if !inc.contains('-') => match direction {
			Direction::Outgoing => out,
			Direction::Incoming => inc,
		},
		_ => kind,
	}
}
