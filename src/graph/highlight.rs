//! Which nodes are emphasized, driven by selection or search.

use std::collections::HashSet;

use super::types::{Character, Relationship};

/// Opacity of anything in the active set (or of everything when unrestricted).
pub const NODE_OPACITY: f64 = 1.0;
/// Opacity of dimmed nodes and labels.
pub const NODE_DIMMED: f64 = 0.3;
/// Opacity of links between two active nodes.
pub const LINK_OPACITY: f64 = 0.6;
/// Opacity of every other link.
pub const LINK_DIMMED: f64 = 0.1;

/// The active node set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
	/// No restriction: every node is active.
	#[default]
	All,
	/// Only these node ids are active.
	Only(HashSet<String>),
}

impl Highlight {
	/// Selection takes precedence over search; with neither, nothing is dimmed.
	pub fn compute(
		selected: Option<&str>,
		search: &str,
		characters: &[Character],
		relationships: &[Relationship],
	) -> Self {
		if let Some(id) = selected {
			return Self::neighborhood(id, relationships);
		}
		if !search.is_empty() {
			return Self::search(search, characters);
		}
		Highlight::All
	}

	/// `id` plus every character it shares a relationship with, in either direction.
	pub fn neighborhood(id: &str, relationships: &[Relationship]) -> Self {
		let mut active = HashSet::from([id.to_owned()]);
		for rel in relationships {
			if rel.source == id {
				active.insert(rel.target.clone());
			} else if rel.target == id {
				active.insert(rel.source.clone());
			}
		}
		Highlight::Only(active)
	}

	/// Characters whose name or any alias contains `term`, ignoring case.
	pub fn search(term: &str, characters: &[Character]) -> Self {
		let needle = term.to_lowercase();
		let hit = |s: &String| s.to_lowercase().contains(&needle);
		Highlight::Only(
			characters
				.iter()
				.filter(|c| hit(&c.name) || c.aliases.iter().any(|a| hit(a)))
				.map(|c| c.name.clone())
				.collect(),
		)
	}

	/// Whether `id` is rendered at full emphasis.
	pub fn is_active(&self, id: &str) -> bool {
		match self {
			Highlight::All => true,
			Highlight::Only(ids) => ids.contains(id),
		}
	}

	/// True when something is dimmed.
	pub fn is_restricted(&self) -> bool {
		matches!(self, Highlight::Only(_))
	}

	/// Opacity of a node or its label.
	pub fn node_opacity(&self, id: &str) -> f64 {
		if self.is_active(id) {
			NODE_OPACITY
		} else {
			NODE_DIMMED
		}
	}

	/// A link is bright only when both endpoints are active.
	pub fn link_opacity(&self, source: &str, target: &str) -> f64 {
		if self.is_active(source) && self.is_active(target) {
			LINK_OPACITY
		} else {
			LINK_DIMMED
		}
	}
}
