//! Drag gestures translated into pins and force re-parameterization.

use std::collections::HashMap;

use log::{debug, warn};

use super::engine::LayoutEngine;
use super::forces::ForceParams;
use super::types::{NodeId, Point};

/// What happens to the force set when the last active drag ends.
#[derive(Clone, Debug, PartialEq)]
pub enum ReleaseEffect {
	/// Keep the current forces and let the layout cool down.
	Settle,
	/// Swap in these forces and reheat, regrouping the whole layout.
	Recluster(ForceParams),
}

/// How gestures feed back into the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerOptions {
	/// Keep a bubble pinned where it was dropped until it is clicked.
	pub sticky_pins: bool,
	/// Effect of ending the last drag.
	pub release: ReleaseEffect,
	/// Alpha applied when a gesture wakes a resting layout.
	pub wake_alpha: f64,
	/// Alpha target held while any bubble is being dragged.
	pub hold_alpha: f64,
}

impl Default for ControllerOptions {
	fn default() -> Self {
		Self {
			sticky_pins: false,
			release: ReleaseEffect::Recluster(ForceParams::recluster()),
			wake_alpha: 0.3,
			hold_alpha: 0.3,
		}
	}
}

/// Per-bubble drag state. Bubbles absent from the map are idle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
	/// Not held by any pointer.
	Idle,
	/// Pinned under the pointer.
	Dragging {
		/// Last pointer position in layout space.
		at: Point,
	},
}

/// Tracks active drags. Each bubble moves independently through
/// `Idle -> Dragging -> Idle`.
#[derive(Debug, Default)]
pub struct InteractionController {
	options: ControllerOptions,
	drags: HashMap<NodeId, Point>,
}

impl InteractionController {
	/// Controller with no active drags.
	pub fn new(options: ControllerOptions) -> Self {
		Self {
			options,
			drags: HashMap::new(),
		}
	}

	/// Options in effect.
	pub fn options(&self) -> &ControllerOptions {
		&self.options
	}

	/// Drag state of `id`.
	pub fn state(&self, id: NodeId) -> DragState {
		match self.drags.get(&id) {
			Some(&at) => DragState::Dragging { at },
			None => DragState::Idle,
		}
	}

	/// True while any bubble is held.
	pub fn is_dragging(&self) -> bool {
		!self.drags.is_empty()
	}

	/// Number of bubbles held right now.
	pub fn active_drags(&self) -> usize {
		self.drags.len()
	}

	/// Pins `id` under the pointer. The first concurrent drag keeps the
	/// layout warm and wakes it if it was resting.
	pub fn drag_start(&mut self, engine: &mut LayoutEngine, id: NodeId, at: Point) -> bool {
		if !engine.pin(id, at) {
			warn!("drag start on unknown bubble {id:?} ignored");
			return false;
		}
		if self.drags.is_empty() {
			engine.set_alpha_target(self.options.hold_alpha);
			if engine.is_running() {
				engine.start();
			} else {
				engine.reheat(self.options.wake_alpha);
			}
		}
		self.drags.insert(id, at);
		debug!("drag start {id:?} at ({:.1}, {:.1})", at.x, at.y);
		true
	}

	/// Moves the pin of a bubble that is being dragged.
	pub fn drag_move(&mut self, engine: &mut LayoutEngine, id: NodeId, at: Point) -> bool {
		let Some(slot) = self.drags.get_mut(&id) else {
			debug!("drag move on {id:?} without a drag in progress ignored");
			return false;
		};
		if !engine.pin(id, at) {
			warn!("drag move on stale bubble {id:?} dropped");
			self.drags.remove(&id);
			return false;
		}
		*slot = at;
		true
	}

	/// Releases a dragged bubble. When it was the last drag the alpha target
	/// drops back to zero and the configured release effect runs.
	pub fn drag_end(&mut self, engine: &mut LayoutEngine, id: NodeId) -> bool {
		if self.drags.remove(&id).is_none() {
			debug!("drag end on {id:?} without a drag in progress ignored");
			return false;
		}
		if !self.options.sticky_pins && !engine.unpin(id) {
			warn!("drag end on stale bubble {id:?}");
		}
		if self.drags.is_empty() {
			engine.set_alpha_target(0.0);
			if let ReleaseEffect::Recluster(params) = &self.options.release {
				debug!("drag released, reclustering");
				engine.set_forces(params.clone());
				engine.reheat(self.options.wake_alpha);
			}
		}
		true
	}

	/// A click without movement frees a pinned bubble and leaves the force
	/// set alone.
	pub fn click(&mut self, engine: &mut LayoutEngine, id: NodeId) -> bool {
		let Some(node) = engine.node(id) else {
			warn!("click on unknown bubble {id:?} ignored");
			return false;
		};
		if !node.is_pinned() || self.drags.contains_key(&id) {
			return false;
		}
		engine.unpin(id);
		if !engine.is_running() {
			engine.reheat(self.options.wake_alpha);
		}
		true
	}

	/// Forgets every drag, e.g. after the node set was rebuilt.
	pub fn reset(&mut self) {
		self.drags.clear();
	}
}
