//! Collapse directed relationship records into an undirected render graph.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::types::{AnalysisInput, Character, GraphData, Link, Node, PairKey, Relationship};
use crate::error::GraphError;

/// Build the render graph.
///
/// One node per unique character name, in input order. One link per unordered
/// pair, in first-occurrence order, carrying the fields of the strongest record
/// for that pair (ties keep the first record). Relationships whose endpoints are
/// not characters are dropped.
pub fn build_graph(characters: &[Character], relationships: &[Relationship]) -> GraphData {
	let mut seen = HashSet::with_capacity(characters.len());
	let mut nodes = Vec::with_capacity(characters.len());
	for character in characters {
		// Identity is the name: later characters with the same name merge into the first.
		if seen.insert(character.name.as_str()) {
			nodes.push(Node::from(character));
		} else {
			debug!("merging duplicate character `{}`", character.name);
		}
	}

	let mut slots: HashMap<PairKey, usize> = HashMap::new();
	let mut links: Vec<Link> = Vec::new();
	for rel in relationships {
		if let Err(e) = check_endpoints(&seen, rel) {
			warn!("dropping relationship: {e}");
			continue;
		}

		let key = PairKey::new(&rel.source, &rel.target);
		match slots.get(&key) {
			Some(&slot) => {
				if rel.strength > links[slot].value {
					links[slot] = Link::from(rel);
				}
			}
			None => {
				slots.insert(key, links.len());
				links.push(Link::from(rel));
			}
		}
	}

	debug!(
		"built graph: {} nodes, {} links from {} relationships",
		nodes.len(),
		links.len(),
		relationships.len()
	);
	GraphData { nodes, links }
}

/// Build from a parsed analysis payload.
pub fn build_from_input(input: &AnalysisInput) -> GraphData {
	build_graph(&input.characters, &input.relationships)
}

/// Parse and build, degrading any structural failure to an empty graph.
pub fn build_graph_from_json(json: &str) -> GraphData {
	match AnalysisInput::from_json(json) {
		Ok(input) => build_from_input(&input),
		Err(e) => {
			warn!("{e}; showing an empty graph");
			GraphData::default()
		}
	}
}

fn check_endpoints(names: &HashSet<&str>, rel: &Relationship) -> Result<(), GraphError> {
	for endpoint in [&rel.source, &rel.target] {
		if !names.contains(endpoint.as_str()) {
			return Err(GraphError::DanglingEndpoint {
				from: rel.source.clone(),
				to: rel.target.clone(),
				missing: endpoint.clone(),
			});
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn character(name: &str) -> Character {
		Character {
			name: name.into(),
			mentions: 3,
			..Default::default()
		}
	}

	fn rel(source: &str, target: &str, strength: f64, kind: &str) -> Relationship {
		Relationship {
			source: source.into(),
			target: target.into(),
			kind: kind.into(),
			strength,
			..Default::default()
		}
	}

	#[test]
	fn three_character_scenario() {
		let characters = vec![character("A"), character("B"), character("C")];
		let relationships = vec![
			rel("A", "B", 4.0, "ab"),
			rel("B", "A", 9.0, "ba"),
			rel("B", "C", 2.0, "bc"),
		];
		let graph = build_graph(&characters, &relationships);

		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["A", "B", "C"]);
		assert_eq!(graph.links.len(), 2);
		assert_eq!(graph.links[0].key(), PairKey::new("A", "B"));
		assert_eq!(graph.links[0].value, 9.0);
		assert_eq!(graph.links[0].kind, "ba");
		assert_eq!(graph.links[0].source, "B");
		assert_eq!(graph.links[1].key(), PairKey::new("B", "C"));
		assert_eq!(graph.links[1].value, 2.0);
	}

	#[test]
	fn strongest_record_wins() {
		let characters = vec![character("A"), character("B")];
		let graph = build_graph(
			&characters,
			&[rel("A", "B", 3.0, "weak"), rel("B", "A", 7.0, "strong")],
		);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].value, 7.0);
		assert_eq!(graph.links[0].kind, "strong");
	}

	#[test]
	fn ties_keep_first_record() {
		let characters = vec![character("A"), character("B")];
		let graph = build_graph(
			&characters,
			&[
				rel("A", "B", 5.0, "first"),
				rel("B", "A", 5.0, "second"),
				rel("A", "B", 5.0, "third"),
			],
		);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].kind, "first");
	}

	#[test]
	fn weaker_repeat_keeps_existing_link() {
		let characters = vec![character("A"), character("B")];
		let graph = build_graph(
			&characters,
			&[rel("A", "B", 6.0, "kept"), rel("A", "B", 1.0, "ignored")],
		);
		assert_eq!(graph.links[0].kind, "kept");
	}

	#[test]
	fn dangling_endpoints_are_dropped() {
		let characters = vec![character("A"), character("B")];
		let graph = build_graph(
			&characters,
			&[rel("A", "Nobody", 10.0, "x"), rel("A", "B", 1.0, "y")],
		);
		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.links[0].kind, "y");
	}

	#[test]
	fn duplicate_names_merge_into_first() {
		let mut second = character("A");
		second.description = "impostor".into();
		let graph = build_graph(&[character("A"), second, character("B")], &[]);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.nodes[0].description, "");
	}

	#[test]
	fn malformed_json_degrades_to_empty_graph() {
		assert!(build_graph_from_json(r#"{"characters": 3, "relationships": []}"#).is_empty());
		assert!(build_graph_from_json("not json").is_empty());

		let graph = build_graph_from_json(
			r#"{"characters": [{"name": "A"}, {"name": "B"}],
				"relationships": [{"source": "A", "target": "B", "strength": 2}]}"#,
		);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
	}

	#[test]
	fn bundled_analysis_builds() {
		let graph = build_graph_from_json(include_str!("../../demos/sample_analysis.json"));
		assert_eq!(graph.nodes.len(), 12);
		// 25 records, 4 reverse duplicates and one unknown character.
		assert_eq!(graph.links.len(), 20);
		assert!(graph.links.iter().all(|l| !l.touches("Colonel Fitzwilliam")));
		let lovers = &graph.links[0];
		assert_eq!((lovers.value, lovers.kind.as_str()), (10.0, "admirer"));
	}

	fn names() -> impl Strategy<Value = String> {
		prop::sample::select(vec!["A", "B", "C", "D", "E"]).prop_map(String::from)
	}

	fn relationships() -> impl Strategy<Value = Vec<Relationship>> {
		prop::collection::vec(
			(names(), names(), 0u8..20).prop_map(|(s, t, w)| rel(&s, &t, w as f64, "")),
			0..40,
		)
	}

	proptest! {
		#[test]
		fn at_most_one_link_per_pair(rels in relationships()) {
			let characters: Vec<_> = ["A", "B", "C", "D"].into_iter().map(character).collect();
			let graph = build_graph(&characters, &rels);

			let keys: HashSet<_> = graph.links.iter().map(Link::key).collect();
			prop_assert_eq!(keys.len(), graph.links.len());

			for link in &graph.links {
				let max = rels
					.iter()
					.filter(|r| PairKey::new(&r.source, &r.target) == link.key())
					.map(|r| r.strength)
					.fold(f64::MIN, f64::max);
				prop_assert_eq!(link.value, max);
				prop_assert!(link.source != "E" && link.target != "E");
			}
		}

		#[test]
		fn pair_set_is_order_independent(rels in relationships()) {
			let characters: Vec<_> = ["A", "B", "C", "D", "E"].into_iter().map(character).collect();
			let mut reversed = rels.clone();
			reversed.reverse();

			let summary = |g: GraphData| {
				let mut v: Vec<_> = g.links.iter().map(|l| (l.key(), l.value as u32)).collect();
				v.sort();
				v
			};
			prop_assert_eq!(
				summary(build_graph(&characters, &rels)),
				summary(build_graph(&characters, &reversed))
			);
		}
	}
}
