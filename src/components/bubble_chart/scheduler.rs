//! A self re-arming `requestAnimationFrame` task.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::prelude::*;

/// What the task wants after running a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
	/// Schedule another frame.
	Continue,
	/// Stop scheduling until [`FrameLoop::resume`].
	Suspend,
}

struct Inner {
	handle: Cell<Option<i32>>,
	callback: RefCell<Option<Closure<dyn FnMut()>>>,
	task: RefCell<Box<dyn FnMut() -> LoopControl>>,
}

impl Inner {
	fn arm(&self) {
		if self.handle.get().is_some() {
			return;
		}
		let Some(window) = web_sys::window() else {
			warn!("no window, frame not scheduled");
			return;
		};
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => self.handle.set(Some(id)),
			Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
		}
	}

	fn disarm(&self) {
		if let Some(id) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
	}

	fn run(weak: &Weak<Inner>) {
		let Some(inner) = weak.upgrade() else {
			return;
		};
		inner.handle.set(None);
		let control = {
			let mut task = inner.task.borrow_mut();
			(*task)()
		};
		if control == LoopControl::Continue {
			inner.arm();
		}
	}
}

impl Drop for Inner {
	fn drop(&mut self) {
		self.disarm();
	}
}

/// Runs a task once per animation frame. At most one frame is pending at
/// any time, so frames never overlap. Dropping the last handle cancels it.
#[derive(Clone)]
pub struct FrameLoop {
	inner: Rc<Inner>,
}

impl FrameLoop {
	/// Creates a suspended loop around `task`.
	pub fn new(task: impl FnMut() -> LoopControl + 'static) -> Self {
		let inner = Rc::new(Inner {
			handle: Cell::new(None),
			callback: RefCell::new(None),
			task: RefCell::new(Box::new(task)),
		});
		let weak = Rc::downgrade(&inner);
		*inner.callback.borrow_mut() = Some(Closure::new(move || Inner::run(&weak)));
		Self { inner }
	}

	/// Schedules the next frame unless one is already pending.
	pub fn resume(&self) {
		self.inner.arm();
	}

	/// Cancels the pending frame; the loop can be resumed later.
	pub fn suspend(&self) {
		self.inner.disarm();
	}

	/// Cancels the pending frame and releases the callback for good.
	/// Must not be called from inside the task.
	pub fn cancel(&self) {
		self.inner.disarm();
		self.inner.callback.borrow_mut().take();
	}
}
