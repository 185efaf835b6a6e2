use super::error::{LayoutError, Result};

/// A position in layout space (inner drawing area, origin top-left).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal offset, growing rightwards.
	pub x: f64,
	/// Vertical offset, growing downwards.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Space reserved around the drawing area, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
	/// Top gap.
	pub top: f64,
	/// Right gap.
	pub right: f64,
	/// Bottom gap.
	pub bottom: f64,
	/// Left gap.
	pub left: f64,
}

impl Default for Margin {
	fn default() -> Self {
		Self {
			top: 20.0,
			right: 20.0,
			bottom: 30.0,
			left: 50.0,
		}
	}
}

impl Margin {
	/// No margin at all; layout space equals the surface.
	pub const ZERO: Margin = Margin {
		top: 0.0,
		right: 0.0,
		bottom: 0.0,
		left: 0.0,
	};
}

/// Outer surface size plus margins. Layout happens in the inner area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Outer surface width.
	pub width: f64,
	/// Outer surface height.
	pub height: f64,
	/// Space kept clear around the layout area.
	pub margin: Margin,
}

impl Viewport {
	/// Viewport of a `width` x `height` surface.
	pub fn new(width: f64, height: f64, margin: Margin) -> Self {
		Self {
			width,
			height,
			margin,
		}
	}

	/// Width left for layout after the side margins.
	pub fn inner_width(&self) -> f64 {
		self.width - self.margin.left - self.margin.right
	}

	/// Height left for layout after the top and bottom margins.
	pub fn inner_height(&self) -> f64 {
		self.height - self.margin.top - self.margin.bottom
	}

	/// Inner `(width, height)`, rejecting empty or non-finite areas.
	pub fn validate(&self) -> Result<(f64, f64)> {
		let (w, h) = (self.inner_width(), self.inner_height());
		if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
			return Err(LayoutError::InvalidDimensions {
				width: w,
				height: h,
			});
		}
		Ok((w, h))
	}

	/// Converts a surface coordinate into layout space.
	pub fn to_layout(&self, sx: f64, sy: f64) -> Point {
		Point::new(sx - self.margin.left, sy - self.margin.top)
	}
}

/// Parallel input columns, one row per bubble.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
	/// Display label per row.
	pub labels: Vec<String>,
	/// Sizing value per row.
	pub values: Vec<f64>,
	/// Cluster key per row.
	pub categories: Vec<String>,
}

impl ChartData {
	/// Number of rows, going by the value column.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// True when there are no values.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Checks column lengths and value finiteness.
	pub fn validate(&self) -> Result<()> {
		let (labels, values, categories) =
			(self.labels.len(), self.values.len(), self.categories.len());
		if labels != values || values != categories {
			return Err(LayoutError::LengthMismatch {
				labels,
				values,
				categories,
			});
		}
		if let Some((index, &value)) = self.values.iter().enumerate().find(|(_, v)| !v.is_finite())
		{
			return Err(LayoutError::NonFiniteValue { index, value });
		}
		Ok(())
	}
}

/// Everything the hosting widget can be configured with.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
	/// Rows to lay out.
	pub data: ChartData,
	/// Series name shown in tooltips; also the comparison key of
	/// [`ChargeRule::SeriesLabel`](super::ChargeRule::SeriesLabel).
	pub display_name: String,
	/// Surface width in pixels.
	pub width: f64,
	/// Surface height in pixels.
	pub height: f64,
	/// Margin around the layout area.
	pub margin: Margin,
}

impl ChartOptions {
	/// The surface these options describe.
	pub fn viewport(&self) -> Viewport {
		Viewport::new(self.width, self.height, self.margin)
	}
}

/// Identifies a bubble within one built node set.
///
/// `epoch` changes on every rebuild so ids held by stale event handlers
/// never resolve against a newer dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
	/// Build the id belongs to.
	pub epoch: u64,
	/// Row in the input data.
	pub index: usize,
}

/// One simulated circle.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
	/// Row label.
	pub label: String,
	/// Cluster key.
	pub category: String,
	/// Raw value the radius was derived from.
	pub value: f64,
	/// Circle radius in layout units.
	pub radius: f64,
	/// Center in layout space.
	pub position: Point,
	/// Per-tick displacement before friction.
	pub velocity: Point,
	/// Pinned position; while set the bubble does not integrate.
	pub fixed: Option<Point>,
}

impl Bubble {
	/// True while a pin holds the bubble in place.
	pub fn is_pinned(&self) -> bool {
		self.fixed.is_some()
	}

	/// Hit test: is `p` inside the circle (edge included)?
	pub fn contains(&self, p: Point) -> bool {
		let (dx, dy) = (p.x - self.position.x, p.y - self.position.y);
		dx * dx + dy * dy <= self.radius * self.radius
	}
}
