//! Headless bubble-cluster layout: a damped force simulation that groups
//! circles by category, keeps them apart and inside the drawing area, and
//! lets them be dragged and pinned.
//!
//! Nothing in here touches the DOM; a host drives [`BubbleChart::tick`] from
//! whatever scheduler it has and reads positions back through
//! [`BubbleChart::nodes`] or an [`BubbleChart::on_tick`] subscription.

mod anchors;
mod chart;
mod controller;
mod engine;
mod error;
mod forces;
mod scale;
mod types;

pub use anchors::{AnchorStrategy, distinct_categories};
pub use chart::BubbleChart;
pub use controller::{ControllerOptions, DragState, InteractionController, ReleaseEffect};
pub use engine::{LayoutEngine, RunState, SimulationConfig, TickListener};
pub use error::{LayoutError, Result};
pub use forces::{ChargeRule, ForceParams};
pub use scale::SqrtScale;
pub use types::{Bubble, ChartData, ChartOptions, Margin, NodeId, Point, Viewport};
