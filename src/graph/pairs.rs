//! Bidirectional grouping of relationship records for detail views.
//!
//! Unlike the render graph, nothing is discarded by strength here: each pair
//! keeps how A views B and how B views A side by side.

use std::collections::HashMap;

use super::types::{PairKey, Relationship};

/// Up to two directed records for one unordered character pair.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipPair {
	/// Unordered key of the pair.
	pub key: PairKey,
	/// Record in the first-seen orientation.
	pub source_to_target: Relationship,
	/// Record in the reverse orientation, if any.
	pub target_to_source: Option<Relationship>,
}

impl RelationshipPair {
	/// Character the first-seen record starts from.
	pub fn source(&self) -> &str {
		&self.source_to_target.source
	}

	/// Character the first-seen record points at.
	pub fn target(&self) -> &str {
		&self.source_to_target.target
	}

	/// Whether both directions are known.
	pub fn is_mutual(&self) -> bool {
		self.target_to_source.is_some()
	}
}

/// Group relationship records into pairs.
///
/// A record reversed relative to an existing pair fills that pair's reverse
/// slot; a record matching its orientation overwrites the forward slot. Both
/// slots are last-write-wins.
pub fn pair_relationships(relationships: &[Relationship]) -> Vec<RelationshipPair> {
	let mut slots: HashMap<PairKey, usize> = HashMap::new();
	let mut pairs: Vec<RelationshipPair> = Vec::new();

	for rel in relationships {
		let key = PairKey::new(&rel.source, &rel.target);
		let Some(&slot) = slots.get(&key) else {
			slots.insert(key.clone(), pairs.len());
			pairs.push(RelationshipPair {
				key,
				source_to_target: rel.clone(),
				target_to_source: None,
			});
			continue;
		};

		let pair = &mut pairs[slot];
		if pair.source() == rel.target && pair.target() == rel.source {
			pair.target_to_source = Some(rel.clone());
		} else {
			pair.source_to_target = rel.clone();
		}
	}
	pairs
}

/// Coarse strength bands used when listing relationships.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthTier {
	/// Below 2.
	VeryWeak,
	/// 2 up to 4.
	Weak,
	/// 4 up to 7.
	Moderate,
	/// 7 up to 10.
	Strong,
	/// 10 and above.
	VeryStrong,
}

impl StrengthTier {
	/// Band for a raw strength.
	pub fn of(strength: f64) -> Self {
		match strength {
			s if s >= 10.0 => StrengthTier::VeryStrong,
			s if s >= 7.0 => StrengthTier::Strong,
			s if s >= 4.0 => StrengthTier::Moderate,
			s if s >= 2.0 => StrengthTier::Weak,
			_ => StrengthTier::VeryWeak,
		}
	}

	/// Human-readable label.
	pub fn label(self) -> &'static str {
		match self {
			StrengthTier::VeryWeak => "Very Weak",
			StrengthTier::Weak => "Weak",
			StrengthTier::Moderate => "Moderate",
			StrengthTier::Strong => "Strong",
			StrengthTier::VeryStrong => "Very Strong",
		}
	}
}
