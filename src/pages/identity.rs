use leptos::prelude::*;

use crate::components::node_graph::{GraphPreset, NodeGraphCanvas};

#[component]
pub fn Identity() -> impl IntoView {
	view! {
		<div class="fullscreen-graph identity">
			<NodeGraphCanvas preset=GraphPreset::Identity />
			<div class="graph-overlay">
				<h1>"Identity"</h1>
				<p class="subtitle">"Move through the field. Click a bright node to read it."</p>
				<a href="/">"← library"</a>
			</div>
		</div>
	}
}
