//! Analysis input records and the derived render graph.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// How central a character is to the book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Importance {
	/// Protagonists and other central characters.
	Major,
	/// Recurring characters.
	Supporting,
	/// Everyone else. Unknown labels land here too.
	#[default]
	Minor,
}

impl From<String> for Importance {
	fn from(label: String) -> Self {
		match label.to_ascii_lowercase().as_str() {
			"major" => Importance::Major,
			"supporting" => Importance::Supporting,
			_ => Importance::Minor,
		}
	}
}

impl Importance {
	/// Lowercase label as it appears in the analysis payload.
	pub fn as_str(self) -> &'static str {
		match self {
			Importance::Major => "major",
			Importance::Supporting => "supporting",
			Importance::Minor => "minor",
		}
	}
}

/// A character extracted from the book.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Character {
	/// Unique key. Node identity is this string.
	pub name: String,
	/// Other names the character goes by.
	pub aliases: Vec<String>,
	/// Free-text description.
	pub description: String,
	/// Importance tier.
	pub importance: Importance,
	/// Number of mentions in the text.
	pub mentions: u32,
	/// Portion of the book the character spans.
	pub arc_span: Option<f64>,
	/// Number of chunks the character appears in.
	pub appearance_count: Option<u32>,
	/// Presence pattern label, e.g. "consistent".
	pub presence_pattern: Option<String>,
}

/// A directed relationship record: how `source` views `target`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Relationship {
	/// Name of the viewing character.
	pub source: String,
	/// Name of the viewed character.
	pub target: String,
	/// Free-text relationship type.
	#[serde(rename = "type")]
	pub kind: String,
	/// Free-text description.
	pub description: String,
	/// Strength, unbounded above.
	pub strength: f64,
	/// Optional status text.
	pub status: Option<String>,
	/// Portion of the book the relationship spans.
	pub arc_span: Option<f64>,
	/// Number of interactions observed.
	pub appearance_count: Option<u32>,
	/// Development pattern label.
	pub development_pattern: Option<String>,
}

/// Analysis metadata. The graph core ignores it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisMeta {
	/// Character count reported by the analysis.
	pub character_count: u32,
	/// Relationship count reported by the analysis.
	pub relationship_count: u32,
	/// When the analysis ran.
	pub analysis_date: Option<String>,
}

/// The `characters` / `relationships` payload consumed by the graph core.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisInput {
	/// Characters in input order.
	pub characters: Vec<Character>,
	/// Directed relationship records in input order.
	pub relationships: Vec<Relationship>,
	/// Ignored metadata.
	pub meta: AnalysisMeta,
}

impl AnalysisInput {
	/// Parse a JSON document, accepting either the bare analysis object or the
	/// `{bookId, title, author, analysis}` envelope.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		let value: Value =
			serde_json::from_str(json).map_err(|e| GraphError::MalformedInput(e.to_string()))?;
		Self::from_value(&value)
	}

	/// Structural checks only: the payload must be an object and both record
	/// lists must be arrays. Individual malformed records are skipped.
	pub fn from_value(value: &Value) -> Result<Self, GraphError> {
		let object = value
			.as_object()
			.ok_or_else(|| GraphError::MalformedInput("analysis is not an object".into()))?;
		if let Some(inner) = object.get("analysis") {
			return Self::from_value(inner);
		}

		let characters = records::<Character>(object.get("characters"), "characters")?;
		let relationships = records::<Relationship>(object.get("relationships"), "relationships")?;
		let meta = object
			.get("meta")
			.and_then(|m| serde_json::from_value(m.clone()).ok())
			.unwrap_or_default();

		Ok(Self {
			characters,
			relationships,
			meta,
		})
	}
}

fn records<T: DeserializeOwned>(value: Option<&Value>, field: &str) -> Result<Vec<T>, GraphError> {
	let items = value
		.and_then(Value::as_array)
		.ok_or_else(|| GraphError::MalformedInput(format!("`{field}` is not an array")))?;

	Ok(items
		.iter()
		.enumerate()
		.filter_map(|(i, item)| match serde_json::from_value(item.clone()) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!("skipping malformed {field} record #{i}: {e}");
				None
			}
		})
		.collect())
}

/// A vertex of the render graph, one per unique character.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Character name.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Size-driving value: mention count, at least 1.
	pub value: u32,
	/// Importance tier.
	pub importance: Importance,
	/// Character description.
	pub description: String,
	/// Character aliases.
	pub aliases: Vec<String>,
	/// Arc span of the character.
	pub arc_span: Option<f64>,
	/// Appearance count of the character.
	pub appearance_count: Option<u32>,
	/// Presence pattern label.
	pub presence_pattern: Option<String>,
}

impl From<&Character> for Node {
	fn from(c: &Character) -> Self {
		Self {
			id: c.name.clone(),
			name: c.name.clone(),
			value: c.mentions.max(1),
			importance: c.importance,
			description: c.description.clone(),
			aliases: c.aliases.clone(),
			arc_span: c.arc_span,
			appearance_count: c.appearance_count,
			presence_pattern: c.presence_pattern.clone(),
		}
	}
}

/// Order-independent key of a character pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(String, String);

impl PairKey {
	/// Key of the unordered pair `{a, b}`.
	pub fn new(a: &str, b: &str) -> Self {
		if a <= b {
			Self(a.to_owned(), b.to_owned())
		} else {
			Self(b.to_owned(), a.to_owned())
		}
	}

	/// The lexicographically smaller name.
	pub fn first(&self) -> &str {
		&self.0
	}

	/// The lexicographically larger name.
	pub fn second(&self) -> &str {
		&self.1
	}
}

/// An undirected edge of the render graph: the strongest record for a pair.
///
/// `source`/`target` keep the orientation of the winning record.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Source of the winning record.
	pub source: String,
	/// Target of the winning record.
	pub target: String,
	/// Maximum strength seen for the pair.
	pub value: f64,
	/// Type label of the winning record.
	pub kind: String,
	/// Description of the winning record.
	pub description: String,
	/// Status of the winning record.
	pub status: Option<String>,
	/// Arc span of the winning record.
	pub arc_span: Option<f64>,
	/// Interaction count of the winning record.
	pub appearance_count: Option<u32>,
	/// Development pattern of the winning record.
	pub development_pattern: Option<String>,
}

impl Link {
	/// Unordered key of the pair this link connects.
	pub fn key(&self) -> PairKey {
		PairKey::new(&self.source, &self.target)
	}

	/// Whether `id` is one of the two endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.source == id || self.target == id
	}
}

impl From<&Relationship> for Link {
	fn from(r: &Relationship) -> Self {
		Self {
			source: r.source.clone(),
			target: r.target.clone(),
			value: r.strength,
			kind: r.kind.clone(),
			description: r.description.clone(),
			status: r.status.clone(),
			arc_span: r.arc_span,
			appearance_count: r.appearance_count,
			development_pattern: r.development_pattern.clone(),
		}
	}
}

/// Nodes and deduplicated links ready for layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// One node per unique character, in input order.
	pub nodes: Vec<Node>,
	/// One link per unordered pair, in first-occurrence order.
	pub links: Vec<Link>,
}

impl GraphData {
	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_bare_analysis() {
		let input = AnalysisInput::from_json(
			r#"{
				"characters": [
					{"name": "Elizabeth", "aliases": ["Lizzy"], "importance": "major", "mentions": 40, "arcSpan": 0.9}
				],
				"relationships": [
					{"source": "Elizabeth", "target": "Darcy", "type": "romantic", "strength": 8, "developmentPattern": "growing"}
				],
				"meta": {"characterCount": 1, "relationshipCount": 1}
			}"#,
		)
		.unwrap();

		assert_eq!(input.characters.len(), 1);
		assert_eq!(input.characters[0].importance, Importance::Major);
		assert_eq!(input.characters[0].arc_span, Some(0.9));
		assert_eq!(input.relationships[0].kind, "romantic");
		assert_eq!(
			input.relationships[0].development_pattern.as_deref(),
			Some("growing")
		);
		assert_eq!(input.meta.character_count, 1);
	}

	#[test]
	fn parses_book_envelope() {
		let input = AnalysisInput::from_json(
			r#"{"bookId": "1342", "title": "P&P", "author": "Austen",
				"analysis": {"characters": [{"name": "Jane"}], "relationships": []}}"#,
		)
		.unwrap();
		assert_eq!(input.characters[0].name, "Jane");
		assert_eq!(input.characters[0].importance, Importance::Minor);
	}

	#[test]
	fn rejects_non_array_lists() {
		let err =
			AnalysisInput::from_json(r#"{"characters": {}, "relationships": []}"#).unwrap_err();
		assert!(matches!(err, GraphError::MalformedInput(_)));

		let err = AnalysisInput::from_json(r#"{"characters": []}"#).unwrap_err();
		assert!(matches!(err, GraphError::MalformedInput(_)));

		let err = AnalysisInput::from_json("[1, 2]").unwrap_err();
		assert!(matches!(err, GraphError::MalformedInput(_)));
	}

	#[test]
	fn skips_malformed_records() {
		let input = AnalysisInput::from_json(
			r#"{"characters": [{"name": "A"}, 42, {"name": "B", "mentions": "lots"}],
				"relationships": [{"source": "A", "target": "B", "strength": 2}, "nope"]}"#,
		)
		.unwrap();
		assert_eq!(input.characters.len(), 1);
		assert_eq!(input.relationships.len(), 1);
	}

	#[test]
	fn unknown_importance_is_minor() {
		let c: Character = serde_json::from_str(r#"{"name": "X", "importance": "Cameo"}"#).unwrap();
		assert_eq!(c.importance, Importance::Minor);
		let c: Character = serde_json::from_str(r#"{"name": "Y", "importance": "MAJOR"}"#).unwrap();
		assert_eq!(c.importance, Importance::Major);
	}

	#[test]
	fn node_value_defaults_to_one() {
		let node = Node::from(&Character {
			name: "Ghost".into(),
			..Default::default()
		});
		assert_eq!(node.value, 1);
		assert_eq!(node.id, "Ghost");
	}

	#[test]
	fn pair_key_ignores_orientation() {
		assert_eq!(PairKey::new("B", "A"), PairKey::new("A", "B"));
		assert_eq!(PairKey::new("B", "A").first(), "A");
	}
}
