use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent};

use super::behaviors::{Dialogs, EditResult, Inspection, dispatch};
use super::geometry::Point;
use super::loader::load_graph;
use super::mode::Interaction;
use super::model::QuestionId;
use super::source::DataSource;
use super::surface::{CanvasSurface, TextMeasure};
use super::text_fit::LabelStyle;
use super::touch::{TouchInput, TouchStep};
use super::view::{GraphView, GraphViewConfig};

/// The view once the seed question has loaded.
type Slot = Rc<RefCell<Option<Rc<RefCell<GraphView>>>>>;

fn current(slot: &Slot) -> Option<Rc<RefCell<GraphView>>> {
	slot.borrow().clone()
}

/// Prompts through `window.prompt`.
struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
	fn prompt(&self, message: &str, default: &str) -> Option<String> {
		web_sys::window()?
			.prompt_with_message_and_default(message, default)
			.ok()
			.flatten()
	}

	fn inspect(&self, inspection: &Inspection) -> Option<EditResult> {
		if inspection.is_author {
			let text = self.prompt("Edit question:", &inspection.text)?;
			return Some(EditResult { text, vote: None });
		}
		let message = format!(
			"{}: {}\n{} net votes. Vote +1 or -1 (0 withdraws):",
			inspection.author_name, inspection.text, inspection.net_votes
		);
		let current = inspection.vote.map(|v| v.to_string()).unwrap_or_default();
		let answer = self.prompt(&message, &current)?;
		match answer.trim().parse::<i32>() {
			Ok(vote) => Some(EditResult {
				text: inspection.text.clone(),
				vote: Some(vote),
			}),
			Err(_) => {
				warn!("ignoring vote {:?}", answer);
				None
			}
		}
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Client coordinates relative to the canvas.
fn local(canvas_ref: NodeRef<leptos::html::Canvas>, client_x: i32, client_y: i32) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(client_x as f64 - rect.left(), client_y as f64 - rect.top()))
}

/// Canvas-local positions of the active touches.
fn touch_points(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &TouchEvent) -> Vec<Point> {
	let touches = ev.touches();
	(0..touches.length())
		.filter_map(|i| touches.get(i))
		.filter_map(|t| local(canvas_ref, t.client_x(), t.client_y()))
		.collect()
}

fn finish_gesture<D: DataSource + 'static>(slot: &Slot, source: &Rc<D>, at: Point) {
	let Some(view) = current(slot) else {
		return;
	};
	let interaction: Option<Interaction> = view.borrow_mut().pointer_up(at);
	if let Some(interaction) = interaction {
		debug!("{:?}", interaction);
		if let Some(task) = dispatch(&view, interaction, source, &BrowserDialogs) {
			spawn_local(task);
		}
	}
}

/// An interactive, force-laid-out bubble graph of questions and their relations.
///
/// The graph starts from `seed` and its direct neighbours. What clicks do is
/// chosen by `config.interaction_mode`.
#[component]
pub fn QuestionGraphCanvas<D>(
	source: Rc<D>,
	#[prop(into)] config: Signal<GraphViewConfig>,
	#[prop(default = 1)] seed: QuestionId,
) -> impl IntoView
where
	D: DataSource + 'static,
{
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let slot: Slot = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (slot_init, source_init, animate_init) = (slot.clone(), source.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let initial = config.get_untracked();
		canvas.set_width(initial.width as u32);
		canvas.set_height(initial.height as u32);
		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};
		let surface = Rc::new(CanvasSurface::new(ctx, LabelStyle::default().font(false)));

		let (slot_load, source_load, surface_load) = (slot_init.clone(), source_init.clone(), surface.clone());
		spawn_local(async move {
			match load_graph(&*source_load, seed, &*surface_load).await {
				Ok(graph) => {
					let Some(config) = config.try_get_untracked() else {
						debug!("component gone before question {} loaded", seed);
						return;
					};
					let measure: Rc<dyn TextMeasure> = surface_load;
					let view = GraphView::new(graph, &config, measure);
					*slot_load.borrow_mut() = Some(Rc::new(RefCell::new(view)));
				}
				Err(err) => error!("could not load question {}: {}", seed, err),
			}
		});

		let (slot_anim, animate_inner) = (slot_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas.is_connected() {
				// Dropping the view makes in-flight fetches discard their results.
				slot_anim.borrow_mut().take();
				return;
			}
			if let Some(view) = current(&slot_anim) {
				let mut v = view.borrow_mut();
				v.tick();
				v.draw(&*surface);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let slot_cfg = slot.clone();
	Effect::new(move |_| {
		let config = config.get();
		if let Some(canvas) = canvas_ref.get_untracked() {
			canvas.set_width(config.width as u32);
			canvas.set_height(config.height as u32);
		}
		if let Some(view) = current(&slot_cfg) {
			view.borrow_mut().apply_config(&config);
		}
	});

	let touch: Rc<RefCell<TouchInput>> = Rc::new(RefCell::new(TouchInput::new()));

	let (slot_md, touch_md) = (slot.clone(), touch.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if !touch_md.borrow().accepts_mouse(ev.time_stamp()) {
			return;
		}
		if let (Some(view), Some(p)) = (current(&slot_md), local(canvas_ref, ev.client_x(), ev.client_y())) {
			view.borrow_mut().pointer_down(p);
		}
	};

	let slot_mm = slot.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let (Some(view), Some(p)) = (current(&slot_mm), local(canvas_ref, ev.client_x(), ev.client_y())) {
			view.borrow_mut().pointer_move(p);
		}
	};

	let (slot_mu, source_mu, touch_mu) = (slot.clone(), source.clone(), touch.clone());
	let on_mouseup = move |ev: MouseEvent| {
		if !touch_mu.borrow().accepts_mouse(ev.time_stamp()) {
			return;
		}
		if let Some(p) = local(canvas_ref, ev.client_x(), ev.client_y()) {
			finish_gesture(&slot_mu, &source_mu, p);
		}
	};

	let slot_ml = slot.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(view) = current(&slot_ml) {
			view.borrow_mut().cancel_gesture();
		}
	};

	let slot_wh = slot.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let (Some(view), Some(p)) = (current(&slot_wh), local(canvas_ref, ev.client_x(), ev.client_y())) {
			view.borrow_mut().wheel(p, ev.delta_y());
		}
	};

	let (slot_ts, touch_ts) = (slot.clone(), touch.clone());
	let on_touchstart = move |ev: TouchEvent| {
		ev.prevent_default();
		let step = touch_ts.borrow_mut().start(&touch_points(canvas_ref, &ev));
		if let Some(view) = current(&slot_ts) {
			view.borrow_mut().apply_touch(step);
		}
	};

	let (slot_tm, touch_tm) = (slot.clone(), touch.clone());
	let on_touchmove = move |ev: TouchEvent| {
		ev.prevent_default();
		let step = touch_tm.borrow_mut().moved(&touch_points(canvas_ref, &ev));
		if let Some(view) = current(&slot_tm) {
			view.borrow_mut().apply_touch(step);
		}
	};

	let (slot_te, source_te, touch_te) = (slot.clone(), source.clone(), touch.clone());
	let on_touchend = move |ev: TouchEvent| {
		ev.prevent_default();
		let step = touch_te
			.borrow_mut()
			.end(ev.touches().length() as usize, ev.time_stamp());
		if let TouchStep::Up(p) = step {
			finish_gesture(&slot_te, &source_te, p);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="question-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			style="display: block; touch-action: none;"
		/>
	}
}
