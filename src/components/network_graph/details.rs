use leptos::prelude::*;

use crate::graph::{
	AnalysisInput, Connections, Direction, Relationship, StrengthTier, simplified_type,
};

fn connection_row(relationship: &Relationship, direction: Direction) -> impl IntoView + use<> {
	let other = match direction {
		Direction::Outgoing => relationship.target.clone(),
		Direction::Incoming => relationship.source.clone(),
	};
	let kind = simplified_type(&relationship.kind, direction).to_owned();
	let tier = StrengthTier::of(relationship.strength).label();

	view! {
		<li>
			<strong>{other}</strong>
			" · "
			{kind}
			<span class="strength">{tier}</span>
		</li>
	}
}

/// Side panel for the selected character.
#[component]
pub fn NodeDetails(
	#[prop(into)] analysis: Signal<AnalysisInput>,
	selected: RwSignal<Option<String>>,
) -> impl IntoView {
	move || {
		let id = selected.get()?;
		analysis.with(|input| {
			let character = input.characters.iter().find(|c| c.name == id)?;
			let connections = Connections::of(&id, &input.relationships);
			let outgoing = connections
				.outgoing
				.iter()
				.map(|r| connection_row(r, Direction::Outgoing))
				.collect_view();
			let incoming = connections
				.incoming
				.iter()
				.map(|r| connection_row(r, Direction::Incoming))
				.collect_view();
			let aliases = (!character.aliases.is_empty()).then(|| {
				view! { <p class="aliases">"Also known as " {character.aliases.join(", ")}</p> }
			});
			let arc = character
				.arc_span
				.map(|span| view! { <p>"Arc span: " {format!("{:.0}%", span * 100.0)}</p> });

			Some(view! {
				<aside class="node-details">
					<h2>{character.name.clone()}</h2>
					<p class="importance">{character.importance.as_str()}</p>
					{aliases}
					<p>{character.description.clone()}</p>
					<p>"Mentions: " {character.mentions}</p>
					{arc}
					<h3>{format!("How {} sees others", character.name)}</h3>
					<ul>{outgoing}</ul>
					<h3>{format!("How others see {}", character.name)}</h3>
					<ul>{incoming}</ul>
					<button on:click=move |_| selected.set(None)>"Clear selection"</button>
				</aside>
			})
		})
	}
}
