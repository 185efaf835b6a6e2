use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, TouchList};

use super::render;
use super::scheduler::{FrameLoop, LoopControl};
use super::state::{ChartView, Pointer};
use crate::layout::ChartData;

fn canvas_coords(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x - rect.left(), client_y - rect.top())
}

/// `(identifier, x, y)` for every touch in `list`, in canvas coordinates.
fn touch_points(canvas: &HtmlCanvasElement, list: &TouchList) -> Vec<(i32, f64, f64)> {
	(0..list.length())
		.filter_map(|i| list.get(i))
		.map(|t| {
			let (x, y) = canvas_coords(canvas, t.client_x() as f64, t.client_y() as f64);
			(t.identifier(), x, y)
		})
		.collect()
}

#[component]
pub fn BubbleChartCanvas(
	#[prop(into)] data: Signal<ChartData>,
	#[prop(into)] display_name: String,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<ChartView>> = Rc::new(RefCell::new(ChartView::new()));
	let frames: Rc<RefCell<Option<FrameLoop>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, frames_init, resize_cb_init) =
		(state.clone(), frames.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window to draw in");
			return;
		};

		let (w, h) = if fullscreen {
			(
				window
					.inner_width()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(800.0),
				window
					.inner_height()
					.ok()
					.and_then(|v| v.as_f64())
					.unwrap_or(600.0),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(400.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(400.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		if let Err(err) = state_init.borrow_mut().configure(data, &display_name, w, h) {
			warn!("bubble chart not rebuilt: {err}");
		}

		if frames_init.borrow().is_none() {
			let ctx: CanvasRenderingContext2d = match canvas
				.get_context("2d")
				.ok()
				.flatten()
				.and_then(|c| c.dyn_into().ok())
			{
				Some(ctx) => ctx,
				None => {
					error!("canvas has no 2d context");
					return;
				}
			};

			// Every committed tick marks the surface for redraw.
			let state_tick = state_init.clone();
			let dirty = Rc::new(std::cell::Cell::new(false));
			let dirty_tick = dirty.clone();
			state_tick.borrow_mut().chart.on_tick(move |_| dirty_tick.set(true));

			let state_anim = state_init.clone();
			let frame_loop = FrameLoop::new(move || {
				let mut v = state_anim.borrow_mut();
				v.chart.tick();
				if dirty.replace(false) || v.dirty {
					v.dirty = false;
					render::render(&v, &ctx);
				}
				if v.chart.is_running() {
					LoopControl::Continue
				} else {
					LoopControl::Suspend
				}
			});
			*frames_init.borrow_mut() = Some(frame_loop);

			if fullscreen {
				let (state_resize, canvas_resize, frames_resize) =
					(state_init.clone(), canvas.clone(), frames_init.clone());
				*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
					let Some(win) = web_sys::window() else {
						return;
					};
					let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
					let (Some(nw), Some(nh)) = (size(win.inner_width()), size(win.inner_height()))
					else {
						return;
					};
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Err(err) = state_resize.borrow_mut().resize(nw, nh) {
						warn!("resize ignored: {err}");
					}
					if let Some(f) = frames_resize.borrow().as_ref() {
						f.resume();
					}
				}));
				if let Some(ref cb) = *resize_cb_init.borrow() {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		}

		// Nothing to draw until a configure succeeds.
		let has_layout = state_init.borrow().chart.engine().is_some();
		if let Some(f) = frames_init.borrow().as_ref() {
			if has_layout {
				f.resume();
			} else {
				f.suspend();
			}
		}
	});

	// Handles live in a local arena slot so the cleanup closure stays `Send`.
	let teardown = StoredValue::new_local((state.clone(), frames.clone(), resize_cb));
	on_cleanup(move || {
		teardown.try_with_value(|(state, frames, resize_cb)| {
			if let Some(f) = frames.borrow_mut().take() {
				f.cancel();
			}
			state.borrow_mut().chart.dispose();
			if let Some(cb) = resize_cb.borrow_mut().take() {
				if let Some(window) = web_sys::window() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
		});
	});

	// Input runs between frames; each handler wakes the loop so the change
	// is drawn and, if the layout was resting, simulated.
	let wake = {
		let frames = frames.clone();
		move || {
			if let Some(f) = frames.borrow().as_ref() {
				f.resume();
			}
		}
	};

	let (state_md, wake_md) = (state.clone(), wake.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_coords(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		if state_md.borrow_mut().press(Pointer::Mouse, x, y) {
			wake_md();
		}
	};

	let (state_mm, wake_mm) = (state.clone(), wake.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let (x, y) = canvas_coords(&canvas, ev.client_x() as f64, ev.client_y() as f64);
		let mut v = state_mm.borrow_mut();
		if v.is_dragging() {
			v.drag(Pointer::Mouse, x, y);
		}
		v.set_hover(x, y);
		if v.dirty {
			drop(v);
			wake_mm();
		}
	};

	let (state_mu, wake_mu) = (state.clone(), wake.clone());
	let on_mouseup = move |_: MouseEvent| {
		state_mu.borrow_mut().release(Pointer::Mouse);
		wake_mu();
	};

	let (state_ml, wake_ml) = (state.clone(), wake.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let mut v = state_ml.borrow_mut();
		v.release_all();
		v.clear_hover();
		drop(v);
		wake_ml();
	};

	let (state_ts, wake_ts) = (state.clone(), wake.clone());
	let on_touchstart = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let mut grabbed = false;
		for (id, x, y) in touch_points(&canvas, &ev.changed_touches()) {
			grabbed |= state_ts.borrow_mut().press(Pointer::Touch(id), x, y);
		}
		if grabbed {
			ev.prevent_default();
			wake_ts();
		}
	};

	let (state_tm, wake_tm) = (state.clone(), wake.clone());
	let on_touchmove = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let mut moved = false;
		for (id, x, y) in touch_points(&canvas, &ev.changed_touches()) {
			moved |= state_tm.borrow_mut().drag(Pointer::Touch(id), x, y);
		}
		if moved {
			ev.prevent_default();
			wake_tm();
		}
	};

	let (state_te, wake_te) = (state.clone(), wake);
	let on_touchend = move |ev: TouchEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		for (id, _, _) in touch_points(&canvas, &ev.changed_touches()) {
			state_te.borrow_mut().release(Pointer::Touch(id));
		}
		wake_te();
	};
	let on_touchcancel = on_touchend.clone();

	view! {
		<canvas
			node_ref=canvas_ref
			class="bubble-chart-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
