//! The relaxation loop: alpha schedule, force application, integration and
//! boundary clamping.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::anchors::distinct_categories;
use super::error::{LayoutError, Result};
use super::forces::{self, ForceContext, ForceParams};
use super::scale::SqrtScale;
use super::types::{Bubble, ChartData, NodeId, Point, Viewport};

static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Callback notified with the committed node set after every tick.
pub type TickListener = Box<dyn FnMut(&[Bubble])>;

/// Knobs for one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Radius given to the largest value.
	pub max_radius: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Alpha below which the loop counts as settled.
	pub alpha_min: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	/// Forces the simulation starts with.
	pub forces: ForceParams,
	/// Fixed RNG seed; `None` seeds from entropy.
	pub seed: Option<u64>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			max_radius: 50.0,
			alpha_decay: 0.05,
			alpha_min: 0.001,
			velocity_decay: 0.4,
			forces: ForceParams::clustered(),
			seed: None,
		}
	}
}

/// Where the engine is in its alpha schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	/// Ticks advance the layout.
	Running,
	/// Alpha dropped below the threshold; resumable via reheat.
	Settled,
	/// Halted explicitly.
	Stopped,
}

/// Owns the node set and advances it one tick at a time.
pub struct LayoutEngine {
	epoch: u64,
	nodes: Vec<Bubble>,
	width: f64,
	height: f64,
	categories: IndexSet<String>,
	params: ForceParams,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	alpha_min: f64,
	velocity_decay: f64,
	state: RunState,
	rng: StdRng,
	listeners: Vec<TickListener>,
}

impl LayoutEngine {
	/// Starts a simulation over prepared `nodes` inside a `width` x `height`
	/// layout area.
	pub fn build(
		nodes: Vec<Bubble>,
		width: f64,
		height: f64,
		categories: IndexSet<String>,
		config: &SimulationConfig,
	) -> Result<Self> {
		let rng = seeded_rng(config.seed);
		Self::build_with_rng(nodes, width, height, categories, config, rng)
	}

	/// Validates `data`, sizes bubbles against the dataset maximum, scatters
	/// them randomly over the layout area and starts the simulation.
	pub fn from_data(
		data: &ChartData,
		viewport: &Viewport,
		config: &SimulationConfig,
	) -> Result<Self> {
		data.validate()?;
		let (width, height) = viewport.validate()?;
		let mut rng = seeded_rng(config.seed);
		let scale = SqrtScale::fit(&data.values, config.max_radius);
		let nodes = data
			.values
			.iter()
			.zip(&data.labels)
			.zip(&data.categories)
			.map(|((&value, label), category)| Bubble {
				label: label.clone(),
				category: category.clone(),
				value,
				radius: scale.radius(value),
				position: Point::new(rng.r#gen::<f64>() * width, rng.r#gen::<f64>() * height),
				velocity: Point::default(),
				fixed: None,
			})
			.collect();
		let categories = distinct_categories(&data.categories);
		Self::build_with_rng(nodes, width, height, categories, config, rng)
	}

	fn build_with_rng(
		mut nodes: Vec<Bubble>,
		width: f64,
		height: f64,
		categories: IndexSet<String>,
		config: &SimulationConfig,
		rng: StdRng,
	) -> Result<Self> {
		if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
			return Err(LayoutError::InvalidDimensions { width, height });
		}
		for node in &mut nodes {
			if !(node.radius >= 0.0) {
				node.radius = 0.0;
			}
		}
		let epoch = NEXT_EPOCH.fetch_add(1, Ordering::Relaxed);
		debug!(
			"layout epoch {epoch}: {} bubbles, {} categories, {width}x{height}",
			nodes.len(),
			categories.len()
		);
		Ok(Self {
			epoch,
			nodes,
			width,
			height,
			categories,
			params: config.forces.clone(),
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: config.alpha_decay,
			alpha_min: config.alpha_min,
			velocity_decay: config.velocity_decay,
			state: RunState::Running,
			rng,
			listeners: Vec::new(),
		})
	}

	/// Advances one step and notifies listeners. Returns `false` without
	/// doing anything unless the engine is running.
	pub fn tick(&mut self) -> bool {
		if self.state != RunState::Running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let ctx = ForceContext {
			alpha: self.alpha,
			width: self.width,
			height: self.height,
			categories: &self.categories,
			params: &self.params,
		};
		forces::apply_all(&mut self.nodes, &ctx, &mut self.rng);
		self.integrate();
		for listener in &mut self.listeners {
			listener(&self.nodes);
		}
		if self.alpha < self.alpha_min {
			self.state = RunState::Settled;
			debug!("layout epoch {} settled", self.epoch);
		}
		true
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.velocity_decay;
		let (width, height) = (self.width, self.height);
		for node in &mut self.nodes {
			if let Some(p) = node.fixed {
				node.position = p;
				node.velocity = Point::default();
				continue;
			}
			node.velocity.x *= keep;
			node.velocity.y *= keep;
			node.position.x += node.velocity.x;
			node.position.y += node.velocity.y;
			clamp_axis(&mut node.position.x, &mut node.velocity.x, node.radius, width);
			clamp_axis(&mut node.position.y, &mut node.velocity.y, node.radius, height);
		}
	}

	/// Sets alpha and resumes ticking.
	pub fn reheat(&mut self, alpha: f64) {
		debug!("layout epoch {} reheat to {alpha}", self.epoch);
		self.alpha = alpha;
		self.state = RunState::Running;
	}

	/// Resumes ticking without touching alpha.
	pub fn start(&mut self) {
		self.state = RunState::Running;
	}

	/// Restarts the alpha schedule from the top.
	pub fn restart(&mut self) {
		self.reheat(1.0);
	}

	/// Halts the loop. No tick advances until `start`, `restart` or `reheat`.
	pub fn stop(&mut self) {
		self.state = RunState::Stopped;
	}

	/// Value alpha decays towards instead of zero.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Swaps every force definition at once. Nodes are untouched.
	pub fn set_forces(&mut self, params: ForceParams) {
		self.params = params;
	}

	/// Forces currently in effect.
	pub fn forces(&self) -> &ForceParams {
		&self.params
	}

	/// Current temperature.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Value alpha is decaying towards.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Current run state.
	pub fn state(&self) -> RunState {
		self.state
	}

	/// True while ticks advance the layout.
	pub fn is_running(&self) -> bool {
		self.state == RunState::Running
	}

	/// Ticks left before the loop settles, or `None` if the current alpha
	/// target keeps it running forever.
	pub fn ticks_to_settle(&self) -> Option<usize> {
		if self.state != RunState::Running {
			return Some(0);
		}
		let (a, t, d) = (self.alpha, self.alpha_target, self.alpha_decay);
		if t >= self.alpha_min || d <= 0.0 {
			return None;
		}
		// alpha after n ticks: t + (a - t) * (1 - d)^n
		let first = t + (a - t) * (1.0 - d);
		if d >= 1.0 || first < self.alpha_min {
			return Some(1);
		}
		let n = ((self.alpha_min - t) / (a - t)).ln() / (1.0 - d).ln();
		Some(n.ceil() as usize)
	}

	/// Subscribes `listener` to every committed tick.
	pub fn on_tick(&mut self, listener: impl FnMut(&[Bubble]) + 'static) {
		self.listeners.push(Box::new(listener));
	}

	/// Stops the engine and hands its listeners over to a successor.
	pub fn into_listeners(mut self) -> Vec<TickListener> {
		self.stop();
		std::mem::take(&mut self.listeners)
	}

	pub(crate) fn set_listeners(&mut self, listeners: Vec<TickListener>) {
		self.listeners = listeners;
	}

	/// Build number stamped into every [`NodeId`] of this node set.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Layout area width.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Layout area height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Distinct categories in first-seen order.
	pub fn categories(&self) -> &IndexSet<String> {
		&self.categories
	}

	/// Bubbles in input order.
	pub fn nodes(&self) -> &[Bubble] {
		&self.nodes
	}

	/// Number of bubbles.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// True for an empty node set.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Ids of every bubble, in input order.
	pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
		(0..self.nodes.len()).map(|index| NodeId {
			epoch: self.epoch,
			index,
		})
	}

	/// Id of the bubble at `index`, if the index is in range.
	pub fn id(&self, index: usize) -> Option<NodeId> {
		(index < self.nodes.len()).then_some(NodeId {
			epoch: self.epoch,
			index,
		})
	}

	fn resolve(&self, id: NodeId) -> Option<usize> {
		(id.epoch == self.epoch && id.index < self.nodes.len()).then_some(id.index)
	}

	/// True if `id` belongs to this node set.
	pub fn contains(&self, id: NodeId) -> bool {
		self.resolve(id).is_some()
	}

	/// The bubble behind `id`, unless the id is stale.
	pub fn node(&self, id: NodeId) -> Option<&Bubble> {
		self.resolve(id).map(|i| &self.nodes[i])
	}

	/// Current center of `id`.
	pub fn position(&self, id: NodeId) -> Option<Point> {
		self.node(id).map(|b| b.position)
	}

	/// Top-most bubble (last drawn) containing `p`.
	pub fn node_at(&self, p: Point) -> Option<NodeId> {
		self.nodes
			.iter()
			.rposition(|b| b.contains(p))
			.and_then(|i| self.id(i))
	}

	/// Pins a bubble at `p`, clamped into the area its radius allows.
	/// Returns `false` for ids that do not belong to this node set.
	pub fn pin(&mut self, id: NodeId, p: Point) -> bool {
		let Some(i) = self.resolve(id) else {
			return false;
		};
		let r = self.nodes[i].radius;
		let (mut x, mut y) = (p.x, p.y);
		clamp_axis(&mut x, &mut 0.0, r, self.width);
		clamp_axis(&mut y, &mut 0.0, r, self.height);
		self.nodes[i].fixed = Some(Point::new(x, y));
		true
	}

	/// Releases a pin. Returns `false` for unknown ids.
	pub fn unpin(&mut self, id: NodeId) -> bool {
		let Some(i) = self.resolve(id) else {
			return false;
		};
		self.nodes[i].fixed = None;
		true
	}
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_entropy(),
	}
}

/// Keeps `pos` within `[radius, extent - radius]`, killing velocity into the
/// wall. Bubbles wider than the extent sit on its midline.
fn clamp_axis(pos: &mut f64, vel: &mut f64, radius: f64, extent: f64) {
	let (lo, hi) = (radius, extent - radius);
	if lo > hi {
		*pos = extent / 2.0;
		*vel = 0.0;
	} else if !(*pos >= lo) {
		*pos = lo;
		*vel = 0.0;
	} else if *pos > hi {
		*pos = hi;
		*vel = 0.0;
	}
}
