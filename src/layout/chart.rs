//! Facade the hosting widget talks to: configuration, lifecycle, tick
//! subscriptions and drag forwarding.

use log::{debug, warn};

use super::controller::{ControllerOptions, InteractionController};
use super::engine::{LayoutEngine, SimulationConfig, TickListener};
use super::error::Result;
use super::forces::ChargeRule;
use super::types::{Bubble, ChartOptions, NodeId, Point};

/// One bubble chart: the current options, its engine and its controller.
///
/// Any change of options rebuilds the node set from scratch; tick
/// subscriptions survive rebuilds.
#[derive(Default)]
pub struct BubbleChart {
	simulation: SimulationConfig,
	options: Option<ChartOptions>,
	engine: Option<LayoutEngine>,
	controller: InteractionController,
	idle_listeners: Vec<TickListener>,
}

impl BubbleChart {
	/// An unconfigured chart; nothing is laid out until [`configure`](Self::configure).
	pub fn new(simulation: SimulationConfig, controls: ControllerOptions) -> Self {
		Self {
			simulation,
			options: None,
			engine: None,
			controller: InteractionController::new(controls),
			idle_listeners: Vec::new(),
		}
	}

	/// Applies `options`, rebuilding when they differ from the current ones.
	/// Returns whether a rebuild happened. On error the previous layout is
	/// left untouched.
	pub fn configure(&mut self, options: ChartOptions) -> Result<bool> {
		if self.options.as_ref() == Some(&options) && self.engine.is_some() {
			return Ok(false);
		}
		let mut config = self.simulation.clone();
		if let ChargeRule::SeriesLabel { label, .. } = &mut config.forces.charge {
			label.clone_from(&options.display_name);
		}
		let mut engine = LayoutEngine::from_data(&options.data, &options.viewport(), &config)?;
		let listeners = match self.engine.take() {
			Some(old) => old.into_listeners(),
			None => std::mem::take(&mut self.idle_listeners),
		};
		engine.set_listeners(listeners);
		self.controller.reset();
		debug!(
			"chart '{}' rebuilt with {} bubbles",
			options.display_name,
			engine.len()
		);
		self.engine = Some(engine);
		self.options = Some(options);
		Ok(true)
	}

	/// Stops the loop and drops the node set and all subscriptions.
	pub fn dispose(&mut self) {
		if let Some(mut engine) = self.engine.take() {
			engine.stop();
		}
		self.idle_listeners.clear();
		self.controller.reset();
		self.options = None;
	}

	/// Subscribes to every tick, across rebuilds.
	pub fn on_tick(&mut self, listener: impl FnMut(&[Bubble]) + 'static) {
		match &mut self.engine {
			Some(engine) => engine.on_tick(listener),
			None => self.idle_listeners.push(Box::new(listener)),
		}
	}

	/// Runs one tick if the layout is live.
	pub fn tick(&mut self) -> bool {
		self.engine.as_mut().is_some_and(LayoutEngine::tick)
	}

	/// Ticks until the layout settles or `max_ticks` ran. Returns the number
	/// of ticks taken.
	pub fn run_until_settled(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.tick() {
			ticks += 1;
		}
		ticks
	}

	/// True while the current layout is animating.
	pub fn is_running(&self) -> bool {
		self.engine.as_ref().is_some_and(LayoutEngine::is_running)
	}

	/// Options of the current layout.
	pub fn options(&self) -> Option<&ChartOptions> {
		self.options.as_ref()
	}

	/// The current engine, if configured.
	pub fn engine(&self) -> Option<&LayoutEngine> {
		self.engine.as_ref()
	}

	/// Mutable access to the current engine.
	pub fn engine_mut(&mut self) -> Option<&mut LayoutEngine> {
		self.engine.as_mut()
	}

	/// Drag bookkeeping.
	pub fn controller(&self) -> &InteractionController {
		&self.controller
	}

	/// Current bubbles; empty before the first configure.
	pub fn nodes(&self) -> &[Bubble] {
		match &self.engine {
			Some(engine) => engine.nodes(),
			None => &[],
		}
	}

	/// Top-most bubble under `p`.
	pub fn node_at(&self, p: Point) -> Option<NodeId> {
		self.engine.as_ref()?.node_at(p)
	}

	/// See [`InteractionController::drag_start`].
	pub fn drag_start(&mut self, id: NodeId, at: Point) -> bool {
		match &mut self.engine {
			Some(engine) => self.controller.drag_start(engine, id, at),
			None => {
				warn!("drag start with no layout built");
				false
			}
		}
	}

	/// See [`InteractionController::drag_move`].
	pub fn drag_move(&mut self, id: NodeId, at: Point) -> bool {
		match &mut self.engine {
			Some(engine) => self.controller.drag_move(engine, id, at),
			None => false,
		}
	}

	/// See [`InteractionController::drag_end`].
	pub fn drag_end(&mut self, id: NodeId) -> bool {
		match &mut self.engine {
			Some(engine) => self.controller.drag_end(engine, id),
			None => false,
		}
	}

	/// See [`InteractionController::click`].
	pub fn click(&mut self, id: NodeId) -> bool {
		match &mut self.engine {
			Some(engine) => self.controller.click(engine, id),
			None => false,
		}
	}
}
