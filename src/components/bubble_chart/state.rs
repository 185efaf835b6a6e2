use std::collections::HashMap;

use crate::layout::{
	BubbleChart, Bubble, ChartData, ChartOptions, ControllerOptions, Margin, NodeId, Point,
	Result, SimulationConfig,
};

/// d3 category10.
const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Pixels the pointer may travel before a press counts as a drag.
const CLICK_SLOP: f64 = 3.0;

/// Source of a gesture. Touch points carry their browser identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pointer {
	Mouse,
	Touch(i32),
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
	node: NodeId,
	start_x: f64,
	start_y: f64,
	moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeId>,
	/// Surface coordinates of the pointer, for tooltip placement.
	pub x: f64,
	pub y: f64,
}

/// Everything the canvas widget keeps between frames.
pub struct ChartView {
	pub chart: BubbleChart,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	gestures: HashMap<Pointer, Gesture>,
	/// Set by the tick subscription and by input; cleared after drawing.
	pub dirty: bool,
}

impl ChartView {
	pub fn new() -> Self {
		Self {
			chart: BubbleChart::new(SimulationConfig::default(), ControllerOptions::default()),
			hover: HoverState::default(),
			width: 0.0,
			height: 0.0,
			gestures: HashMap::new(),
			dirty: true,
		}
	}

	/// Rebuilds the layout for new data or a new surface size.
	pub fn configure(
		&mut self,
		data: ChartData,
		display_name: &str,
		width: f64,
		height: f64,
	) -> Result<bool> {
		let rebuilt = self.chart.configure(ChartOptions {
			data,
			display_name: display_name.to_owned(),
			width,
			height,
			margin: Margin::default(),
		})?;
		self.width = width;
		self.height = height;
		if rebuilt {
			self.gestures.clear();
			self.hover = HoverState::default();
			self.dirty = true;
		}
		Ok(rebuilt)
	}

	pub fn resize(&mut self, width: f64, height: f64) -> Result<bool> {
		let Some(options) = self.chart.options().cloned() else {
			self.width = width;
			self.height = height;
			return Ok(false);
		};
		self.configure(options.data, &options.display_name, width, height)
	}

	pub fn margin(&self) -> Margin {
		self.chart
			.options()
			.map(|o| o.margin)
			.unwrap_or(Margin::ZERO)
	}

	pub fn screen_to_layout(&self, sx: f64, sy: f64) -> Point {
		match self.chart.options() {
			Some(o) => o.viewport().to_layout(sx, sy),
			None => Point::new(sx, sy),
		}
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		self.chart.node_at(self.screen_to_layout(sx, sy))
	}

	pub fn bubble(&self, id: NodeId) -> Option<&Bubble> {
		self.chart.engine()?.node(id)
	}

	pub fn color_for(&self, category: &str) -> &'static str {
		self.chart
			.engine()
			.and_then(|e| e.categories().get_index_of(category))
			.map_or(COLORS[0], |i| COLORS[i % COLORS.len()])
	}

	pub fn set_hover(&mut self, sx: f64, sy: f64) {
		let node = self.node_at_position(sx, sy);
		if node != self.hover.node || node.is_some() {
			self.dirty = true;
		}
		self.hover = HoverState { node, x: sx, y: sy };
	}

	pub fn clear_hover(&mut self) {
		if self.hover.node.take().is_some() {
			self.dirty = true;
		}
	}

	/// Records a press on a bubble. The drag itself starts once the pointer
	/// travels past [`CLICK_SLOP`].
	pub fn press(&mut self, pointer: Pointer, sx: f64, sy: f64) -> bool {
		let Some(node) = self.node_at_position(sx, sy) else {
			return false;
		};
		self.gestures.insert(
			pointer,
			Gesture {
				node,
				start_x: sx,
				start_y: sy,
				moved: false,
			},
		);
		true
	}

	pub fn drag(&mut self, pointer: Pointer, sx: f64, sy: f64) -> bool {
		let at = self.screen_to_layout(sx, sy);
		let Some(g) = self.gestures.get_mut(&pointer) else {
			return false;
		};
		let node = g.node;
		if !g.moved {
			if (sx - g.start_x).hypot(sy - g.start_y) <= CLICK_SLOP {
				return false;
			}
			g.moved = true;
			if !self.chart.drag_start(node, at) {
				self.gestures.remove(&pointer);
				return false;
			}
			self.dirty = true;
			return true;
		}
		self.dirty = true;
		self.chart.drag_move(node, at)
	}

	/// Ends the gesture of `pointer`: a drag is released, a press that never
	/// moved is a click on its bubble.
	pub fn release(&mut self, pointer: Pointer) {
		let Some(g) = self.gestures.remove(&pointer) else {
			return;
		};
		if g.moved {
			self.chart.drag_end(g.node);
		} else {
			self.chart.click(g.node);
		}
		self.dirty = true;
	}

	/// Drops every gesture, e.g. when the pointer leaves the canvas.
	pub fn release_all(&mut self) {
		let pointers: Vec<Pointer> = self.gestures.keys().copied().collect();
		for pointer in pointers {
			self.release(pointer);
		}
	}

	pub fn is_dragging(&self) -> bool {
		!self.gestures.is_empty()
	}
}
