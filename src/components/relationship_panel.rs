use leptos::prelude::*;

use crate::graph::{Relationship, RelationshipPair, StrengthTier, pair_relationships};

fn direction_line(relationship: &Relationship) -> impl IntoView + use<> {
	let heading = format!("How {} views {}", relationship.source, relationship.target);
	let tier = StrengthTier::of(relationship.strength).label();
	let status = relationship
		.status
		.clone()
		.map(|status| view! { <span class="status">{status}</span> });
	let description = (!relationship.description.is_empty())
		.then(|| view! { <p class="description">{relationship.description.clone()}</p> });

	view! {
		<div class="relationship-direction">
			<h4>{heading}</h4>
			<p>
				{relationship.kind.clone()}
				" · "
				<span class="strength">{tier}</span>
				{status}
			</p>
			{description}
		</div>
	}
}

fn pair_row(pair: RelationshipPair) -> impl IntoView {
	let title = format!("{} & {}", pair.source(), pair.target());
	let mutual = pair.is_mutual();
	let forward = direction_line(&pair.source_to_target);
	let reverse = pair.target_to_source.as_ref().map(direction_line);

	view! {
		<li class="relationship-pair" class:mutual=mutual>
			<h3>{title}</h3>
			{forward}
			{reverse}
		</li>
	}
}

/// Both directions of every relationship, narrowed to the selected character
/// when there is one.
#[component]
pub fn RelationshipPanel(
	#[prop(into)] relationships: Signal<Vec<Relationship>>,
	#[prop(into)] selected: Signal<Option<String>>,
) -> impl IntoView {
	let rows = move || {
		let focus = selected.get();
		relationships.with(|all| {
			pair_relationships(all)
				.into_iter()
				.filter(|pair| {
					focus
						.as_deref()
						.is_none_or(|id| pair.source() == id || pair.target() == id)
				})
				.map(pair_row)
				.collect_view()
		})
	};

	view! {
		<section class="relationship-panel">
			<h2>"Relationships"</h2>
			<ul>{rows}</ul>
		</section>
	}
}
