use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::details::NodeDetails;
use super::render;
use super::state::NetworkGraphState;
use crate::error::GraphError;
use crate::graph::{AnalysisInput, GraphData, Highlight, build_from_input};
use crate::layout::{LayoutConfig, Viewport};

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn measure(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen && let Some(window) = web_sys::window() {
		let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return (dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0));
	}
	let parent = canvas.parent_element();
	let parent_dim = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
		parent
			.as_ref()
			.map(|p| f(p) as f64)
			.filter(|d| *d > 0.0)
			.unwrap_or(fallback)
	};
	(
		width.unwrap_or_else(|| parent_dim(web_sys::Element::client_width, 800.0)),
		height.unwrap_or_else(|| parent_dim(web_sys::Element::client_height, 600.0)),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		.ok_or_else(|| GraphError::Render("2d canvas context unavailable".into()))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas view of a character network.
///
/// The layout runs in a per-frame loop; a new `analysis` tears down the running
/// engine before its replacement starts.
#[component]
pub fn NetworkGraph(
	#[prop(into)] analysis: Signal<AnalysisInput>,
	#[prop(default = RwSignal::new(None))] selected: RwSignal<Option<String>>,
	#[prop(default = LayoutConfig::default())] config: LayoutConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (search, set_search) = signal(String::new());
	let (render_error, set_render_error) = signal(None::<String>);
	let (degraded, set_degraded) = signal(false);

	let graph = Memo::new(move |_| analysis.with(build_from_input));
	let highlight = Memo::new(move |_| {
		let selected = selected.get();
		let search = search.get();
		analysis.with(|input| {
			Highlight::compute(
				selected.as_deref(),
				&search,
				&input.characters,
				&input.relationships,
			)
		})
	});

	let state: Rc<RefCell<Option<NetworkGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let alive = Rc::new(Cell::new(true));

	let cleanup = SendWrapper::new((state.clone(), resize_cb.clone(), alive.clone()));
	on_cleanup(move || {
		let (state, resize_cb, alive) = cleanup.take();
		alive.set(false);
		if let Some(s) = state.borrow_mut().as_mut() {
			s.teardown();
		}
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb.borrow_mut().take()) {
			let _ = window
				.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let data = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (w, h) = measure(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		{
			let mut slot = state_init.borrow_mut();
			if let Some(old) = slot.as_mut() {
				old.teardown();
			}
			let next = NetworkGraphState::new(
				data,
				Viewport::new(w, h),
				config.clone(),
				selected.get_untracked(),
				highlight.get_untracked(),
			);
			set_degraded.set(next.engine.is_degraded());
			*slot = Some(next);
		}
		set_render_error.set(None);

		if animate_init.borrow().is_some() {
			return;
		}
		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				warn!("{e}");
				set_render_error.set(Some(e.to_string()));
				return;
			}
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = measure(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(s) = state_resize.borrow_mut().as_mut()
				&& let Err(e) = s.resize(nw, nh)
			{
				warn!("resize ignored: {e}");
			}
		}));
		if let Some(cb) = resize_cb_init.borrow().as_ref() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner, alive) =
			(state_init.clone(), animate_init.clone(), alive.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive.get() {
				drop(animate_inner.borrow_mut().take());
				return;
			}

			let drawn = state_anim
				.borrow_mut()
				.as_mut()
				.map(|s| s.render_frame(|scene, viewport| render::draw(scene, viewport, &ctx)));
			if let Some(Err(e)) = drawn {
				warn!("{e}");
				set_render_error.set(Some(e.to_string()));
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_hl = state.clone();
	Effect::new(move |_| {
		let next = highlight.get();
		let selection = selected.get();
		if let Some(s) = state_hl.borrow_mut().as_mut() {
			s.highlight = next;
			s.controller.select(selection);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_md.borrow_mut().as_mut()
			&& let Err(e) = s.controller.pointer_down(&mut s.engine, x, y)
		{
			warn!("drag ignored: {e}");
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_mm.borrow_mut().as_mut()
			&& let Err(e) = s.controller.pointer_move(&mut s.engine, x, y)
		{
			warn!("drag ignored: {e}");
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = match state_mu.borrow_mut().as_mut() {
			Some(s) => match s.controller.pointer_up(&mut s.engine) {
				Ok(true) => Some(s.controller.selected().map(str::to_owned)),
				Ok(false) => None,
				Err(e) => {
					warn!("release ignored: {e}");
					None
				}
			},
			None => None,
		};
		if let Some(next) = clicked {
			selected.set(next);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut()
			&& let Err(e) = s.controller.pointer_leave(&mut s.engine)
		{
			warn!("release ignored: {e}");
		}
	};

	let summary = move || {
		graph.with(|g| format!("{} characters · {} connections", g.nodes.len(), g.links.len()))
	};

	view! {
		<div class="network-graph">
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<input
					type="search"
					placeholder="Search characters"
					prop:value=search
					on:input=move |ev| set_search.set(event_target_value(&ev))
				/>
				<p class="graph-summary">{summary}</p>
			</div>
			<Show when=move || graph.with(GraphData::is_empty)>
				<p class="graph-notice">"No character data to display."</p>
			</Show>
			<Show when=move || degraded.get()>
				<p class="graph-notice">
					"Relationships could not be laid out; showing characters only."
				</p>
			</Show>
			{move || {
				render_error
					.get()
					.map(|e| {
						view! { <p class="graph-error">"The graph could not be drawn: " {e}</p> }
					})
			}}
			<NodeDetails analysis selected />
		</div>
	}
}
