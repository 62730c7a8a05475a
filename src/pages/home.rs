use leptos::prelude::*;
use log::warn;

use crate::components::network_graph::NetworkGraph;
use crate::components::relationship_panel::RelationshipPanel;
use crate::graph::AnalysisInput;

/// Analysis bundled with the app, in the same shape the analysis service returns.
const SAMPLE_ANALYSIS: &str = include_str!("../../demos/sample_analysis.json");

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (input, load_error) = match AnalysisInput::from_json(SAMPLE_ANALYSIS) {
		Ok(input) => (input, None),
		Err(e) => {
			warn!("bundled analysis rejected: {e}");
			(AnalysisInput::default(), Some(e.to_string()))
		}
	};
	let relationships = input.relationships.clone();
	let analysis = Signal::derive(move || input.clone());
	let relationships = Signal::derive(move || relationships.clone());
	let selected = RwSignal::new(None::<String>);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<NetworkGraph analysis selected fullscreen=true />
				<div class="graph-overlay">
					<h1>"Character Network"</h1>
					<p class="subtitle">
						"Drag characters to rearrange. Click one to focus on its relationships."
					</p>
					{load_error
						.map(|e| {
							view! { <p class="graph-error">"Could not load the analysis: " {e}</p> }
						})}
				</div>
				<RelationshipPanel relationships selected />
			</div>
		</ErrorBoundary>
	}
}
