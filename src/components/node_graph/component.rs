use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, error};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::SimConfig;
use super::growth::GrowthOutcome;
use super::node::NodeId;
use super::provider::{
	DataProvider, EmbeddedProvider, IdentityProvider, load_pool_or_empty, load_records_or_empty,
};
use super::render;
use super::state::{SelectionView, SimulationState};
use super::types::{NodeFilter, NodeKind};

/// Which visualizer a canvas hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphPreset {
	Library,
	Identity,
}

impl GraphPreset {
	fn config(self) -> SimConfig {
		match self {
			GraphPreset::Library => SimConfig::library(),
			GraphPreset::Identity => SimConfig::identity(),
		}
	}

	fn provider(self) -> Box<dyn DataProvider> {
		match self {
			GraphPreset::Library => Box::new(EmbeddedProvider::library()),
			GraphPreset::Identity => Box::new(IdentityProvider),
		}
	}

	fn has_controls(self) -> bool {
		self == GraphPreset::Library
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum SelectionRequest {
	Select(NodeId),
	Clear,
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Run flag shared between the frame loop and the unmount cleanup.
#[derive(Clone, Debug, Default)]
struct LoopGuard(Arc<AtomicBool>);

impl LoopGuard {
	fn stop(&self) {
		self.0.store(true, Ordering::Relaxed);
	}

	fn is_running(&self) -> bool {
		!self.0.load(Ordering::Relaxed)
	}
}

fn entropy_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}

#[component]
pub fn NodeGraphCanvas(preset: GraphPreset) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SimulationState>>> = Rc::new(RefCell::new(None));
	let rng = Rc::new(RefCell::new(SmallRng::seed_from_u64(entropy_seed())));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let node_count = RwSignal::new(0usize);
	let filter = RwSignal::new(NodeFilter::All);
	let search = RwSignal::new(String::new());
	let selection = RwSignal::new(None::<SelectionView>);
	let selection_request = RwSignal::new(None::<SelectionRequest>);

	let (state_init, rng_init, animate_init) = (state.clone(), rng.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window, node graph disabled");
			return;
		};

		let (w, h) = window_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		let provider = preset.provider();
		let records = load_records_or_empty(provider.as_ref());
		let pool = Rc::new(load_pool_or_empty(provider.as_ref()));
		let mut sim =
			SimulationState::from_records(preset.config(), records, w, h, &mut *rng_init.borrow_mut());
		sim.set_filter(filter.get_untracked());
		sim.set_search(&search.get_untracked());
		node_count.set(sim.len());
		let growth_interval = sim.config.growth.as_ref().map(|g| g.interval_ms);
		*state_init.borrow_mut() = Some(sim);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize_handle = window_event_listener(ev::resize, move |_| {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		let growth_timer = growth_interval.and_then(|interval_ms| {
			let (state_grow, rng_grow) = (state_init.clone(), rng_init.clone());
			set_interval_with_handle(
				move || {
					let mut guard = state_grow.borrow_mut();
					let Some(s) = guard.as_mut() else {
						return;
					};
					let outcome = s.grow(&pool, js_sys::Date::now(), &mut *rng_grow.borrow_mut());
					if let GrowthOutcome::Spawned(_) = outcome {
						node_count.set(s.len());
					}
				},
				Duration::from_millis(interval_ms),
			)
			.map_err(|e| error!("growth timer failed to start: {e:?}"))
			.ok()
		});

		let running = LoopGuard::default();
		let (state_anim, animate_inner, running_anim) =
			(state_init.clone(), animate_init.clone(), running.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.is_running() {
				// releases the loop's self-reference; freed after this call returns
				drop(animate_inner.borrow_mut().take());
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(js_sys::Date::now());
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		on_cleanup(move || {
			debug!("node graph unmounted, stopping drivers");
			running.stop();
			resize_handle.remove();
			if let Some(timer) = growth_timer {
				timer.clear();
			}
		});
	});

	let state_filter = state.clone();
	Effect::new(move |_| {
		let f = filter.get();
		if let Some(ref mut s) = *state_filter.borrow_mut() {
			s.set_filter(f);
			selection.set(s.selection_view());
		}
	});

	let state_search = state.clone();
	Effect::new(move |_| {
		let text = search.get();
		if let Some(ref mut s) = *state_search.borrow_mut() {
			s.set_search(&text);
			selection.set(s.selection_view());
		}
	});

	let state_select = state.clone();
	Effect::new(move |_| {
		let Some(request) = selection_request.get() else {
			return;
		};
		if let Some(ref mut s) = *state_select.borrow_mut() {
			let view = match request {
				SelectionRequest::Select(id) => s.select_node(id),
				SelectionRequest::Clear => {
					s.clear_selection();
					None
				}
			};
			selection.set(view);
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_click.borrow_mut() {
			s.pointer_move(x, y);
			selection.set(s.click(x, y));
		}
	};

	let controls = preset.has_controls().then(|| {
		let buttons = std::iter::once(NodeFilter::All)
			.chain(NodeKind::FILTERABLE.map(NodeFilter::Kind))
			.map(|f| {
				view! {
					<button
						class="filter-btn"
						class:active=move || filter.get() == f
						on:click=move |_| filter.set(f)
					>
						{f.label()}
					</button>
				}
			})
			.collect_view();
		view! {
			<div class="graph-controls">
				<div class="filters">{buttons}</div>
				<input
					class="search-input"
					type="text"
					placeholder="search the archive"
					prop:value=move || search.get()
					on:input=move |ev| search.set(event_target_value(&ev))
				/>
			</div>
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="node-graph-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:click=on_click
			style="display: block; cursor: crosshair;"
		/>
		<div class="graph-hud">
			<span class="node-count">"nodes: " {move || node_count.get()}</span>
		</div>
		{controls}
		{move || selection.get().map(|sel| view! { <DetailsPanel sel=sel requests=selection_request /> })}
	}
}

#[component]
fn DetailsPanel(sel: SelectionView, requests: RwSignal<Option<SelectionRequest>>) -> impl IntoView {
	let SelectionView {
		record,
		color,
		related,
		..
	} = sel;
	let date = if record.date.is_empty() {
		"Unknown Date".to_string()
	} else {
		record.date
	};
	let tags = record
		.tags
		.into_iter()
		.map(|tag| view! { <span class="tag">{tag}</span> })
		.collect_view();
	let badges = [record.status, record.version.map(|v| format!("v{v}"))]
		.into_iter()
		.flatten()
		.map(|badge| view! { <span class="badge">{badge}</span> })
		.collect_view();
	let link = (!record.link.is_empty()).then(|| {
		view! {
			<a class="detail-link" href=record.link target="_blank" rel="noopener">
				"open"
			</a>
		}
	});
	let related = (!related.is_empty()).then(|| {
		let items = related
			.into_iter()
			.map(|item| {
				let id = item.id;
				view! {
					<li
						style="cursor: pointer;"
						on:click=move |_| requests.set(Some(SelectionRequest::Select(id)))
					>
						<span style:color=item.color>"●"</span>
						" "
						{item.title}
					</li>
				}
			})
			.collect_view();
		view! {
			<div class="detail-related">
				<h3>"nearby"</h3>
				<ul>{items}</ul>
			</div>
		}
	});

	view! {
		<aside class="details-panel">
			<button class="close-panel" on:click=move |_| requests.set(Some(SelectionRequest::Clear))>
				"×"
			</button>
			<h2>{record.title}</h2>
			<div class="detail-meta">
				<span class="detail-type" style:background=color>
					{record.kind.as_str()}
				</span>
				<span class="detail-date">{date}</span>
				{badges}
			</div>
			<div class="detail-tags">{tags}</div>
			<p class="detail-summary">{record.summary}</p>
			{link}
			{related}
		</aside>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loop_guard_stops_every_clone() {
		let guard = LoopGuard::default();
		let in_loop = guard.clone();
		assert!(in_loop.is_running());
		guard.stop();
		assert!(!in_loop.is_running());
		guard.stop();
		assert!(!guard.is_running());
	}

	#[test]
	fn only_the_library_grows_and_has_controls() {
		assert!(GraphPreset::Library.has_controls());
		assert!(!GraphPreset::Identity.has_controls());
		assert!(GraphPreset::Library.config().growth.is_some());
		assert!(GraphPreset::Identity.config().growth.is_none());
	}
}
