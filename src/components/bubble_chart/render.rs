use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ChartView;
use crate::layout::Bubble;

const BACKGROUND: &str = "#ffffff";
const BUBBLE_OPACITY: f64 = 0.7;
/// Bubbles smaller than this are left unlabeled.
const LABEL_MIN_RADIUS: f64 = 14.0;

pub fn render(view: &ChartView, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
	let margin = view.margin();
	ctx.save();
	let _ = ctx.translate(margin.left, margin.top);
	draw_bubbles(view, ctx);
	ctx.restore();
	draw_tooltip(view, ctx);
}

fn draw_bubbles(view: &ChartView, ctx: &CanvasRenderingContext2d) {
	let hovered = view.hover.node.and_then(|id| view.bubble(id));
	for bubble in view.chart.nodes() {
		let (x, y, r) = (bubble.position.x, bubble.position.y, bubble.radius);
		ctx.set_global_alpha(BUBBLE_OPACITY);
		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(view.color_for(&bubble.category));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if bubble.is_pinned() {
			ctx.set_stroke_style_str("#333333");
			ctx.set_line_width(1.0);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0),
				&JsValue::from_f64(3.0),
			));
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
		if hovered.is_some_and(|h| std::ptr::eq(h, bubble)) {
			ctx.set_stroke_style_str("black");
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		if r >= LABEL_MIN_RADIUS {
			ctx.set_fill_style_str("rgba(0, 0, 0, 0.75)");
			ctx.set_font(&format!("{}px sans-serif", (r / 3.0).clamp(9.0, 14.0)));
			ctx.set_text_align("center");
			let _ = ctx.fill_text(&bubble.label, x, y + 4.0);
			ctx.set_text_align("start");
		}
	}
}

fn tooltip_lines(view: &ChartView, bubble: &Bubble) -> [String; 3] {
	let name = view
		.chart
		.options()
		.map(|o| o.display_name.as_str())
		.unwrap_or_default();
	[
		bubble.label.clone(),
		bubble.category.clone(),
		format!("{name} {}", bubble.value),
	]
}

fn draw_tooltip(view: &ChartView, ctx: &CanvasRenderingContext2d) {
	let Some(bubble) = view.hover.node.and_then(|id| view.bubble(id)) else {
		return;
	};
	let lines = tooltip_lines(view, bubble);
	let (pad, line_h) = (10.0, 16.0);
	ctx.set_font("12px sans-serif");
	let text_w = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let (w, h) = (text_w + 2.0 * pad, lines.len() as f64 * line_h + 2.0 * pad);
	// Keep the box on-canvas: flip left/up when it would overflow.
	let mut bx = view.hover.x + 10.0;
	let mut by = view.hover.y - 10.0;
	if bx + w > view.width {
		bx = view.hover.x - 10.0 - w;
	}
	if by + h > view.height {
		by = view.height - h;
	}
	by = by.max(0.0);

	ctx.set_fill_style_str("rgba(200, 200, 200, 0.8)");
	ctx.fill_rect(bx, by, w, h);
	ctx.set_fill_style_str("black");
	for (i, line) in lines.iter().enumerate() {
		if i < 2 {
			ctx.set_font("bold 12px sans-serif");
		} else {
			ctx.set_font("12px sans-serif");
		}
		let _ = ctx.fill_text(line, bx + pad, by + pad + line_h * (i as f64 + 0.75));
	}
}
