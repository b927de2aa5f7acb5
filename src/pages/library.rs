use leptos::prelude::*;

use crate::components::node_graph::{GraphPreset, NodeGraphCanvas};

/// The archive: every record as a drifting, clustering node.
#[component]
pub fn Library() -> impl IntoView {
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

			<div class="fullscreen-graph library">
				<NodeGraphCanvas preset=GraphPreset::Library />
				<div class="graph-overlay">
					<h1>"Library"</h1>
					<p class="subtitle">"Hover to inspect. Click a node for details. The archive keeps growing."</p>
					<a href="/identity">"identity →"</a>
				</div>
			</div>
		</ErrorBoundary>
	}
}
