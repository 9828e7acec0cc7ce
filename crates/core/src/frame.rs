//! Frame-boundary scheduling.
//!
//! [`FrameScheduler`] is the "run once before the next repaint" primitive the
//! coalescer and the smooth scroller build on. [`FrameQueue`] implements it
//! for hosts that drive frames themselves: the terminal loop ticks it before
//! each draw, the egui app once per `update`, the wasm bridge from the JS
//! `requestAnimationFrame` callback. Tests tick it by hand.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// A one-shot callback run at the next frame boundary.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Identifies a scheduled callback for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

pub trait FrameScheduler {
    /// Register `callback` to run once at the next frame boundary.
    ///
    /// Must not invoke the callback synchronously.
    fn schedule_once(&self, callback: FrameCallback) -> FrameHandle;

    /// Prevent a scheduled callback from running.
    ///
    /// Cancelling a handle that already ran, was already cancelled, or is
    /// due later in the frame currently running is a no-op in the first two
    /// cases and a real cancellation in the third.
    fn cancel(&self, handle: FrameHandle);
}

/// A host-driven frame scheduler.
///
/// Callbacks registered before [`FrameQueue::run_frame`] starts run in that
/// frame, in registration order. Callbacks registered while a frame is
/// running wait for the next one, so a self-rescheduling animation advances
/// exactly one step per frame.
#[derive(Default)]
pub struct FrameQueue {
    next_id: Cell<u64>,
    callbacks: RefCell<BTreeMap<FrameHandle, FrameCallback>>,
    frames: Cell<u64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one frame boundary. Returns how many callbacks fired.
    pub fn run_frame(&self) -> usize {
        self.frames.set(self.frames.get() + 1);
        let due: Vec<FrameHandle> = self.callbacks.borrow().keys().copied().collect();
        let mut fired = 0;
        for handle in due {
            // Re-check each handle: an earlier callback in this frame may
            // have cancelled it.
            let callback = self.callbacks.borrow_mut().remove(&handle);
            if let Some(callback) = callback {
                callback();
                fired += 1;
            }
        }
        fired
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn has_pending(&self) -> bool {
        !self.callbacks.borrow().is_empty()
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_once(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.callbacks.borrow_mut().insert(handle, callback);
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.callbacks.borrow_mut().remove(&handle);
    }
}

impl std::fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .field("frames", &self.frames.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> FrameCallback) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let make = move || -> FrameCallback {
            let c = c.clone();
            Box::new(move || c.set(c.get() + 1))
        };
        (count, make)
    }

    #[test]
    fn callbacks_fire_once_at_next_frame() {
        let queue = FrameQueue::new();
        let (count, make) = counter();
        queue.schedule_once(make());
        queue.schedule_once(make());
        assert_eq!(count.get(), 0);
        assert_eq!(queue.run_frame(), 2);
        assert_eq!(count.get(), 2);
        assert_eq!(queue.run_frame(), 0);
        assert_eq!(count.get(), 2);
        assert_eq!(queue.frame_count(), 2);
    }

    #[test]
    fn cancelled_callback_never_fires() {
        let queue = FrameQueue::new();
        let (count, make) = counter();
        let handle = queue.schedule_once(make());
        queue.cancel(handle);
        queue.cancel(handle);
        assert_eq!(queue.run_frame(), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let queue = FrameQueue::new();
        let (count, make) = counter();
        let handle = queue.schedule_once(make());
        queue.run_frame();
        queue.cancel(handle);
        assert_eq!(count.get(), 1);
        assert!(!queue.has_pending());
    }

    #[test]
    fn scheduling_during_a_frame_defers_to_the_next() {
        let queue = Rc::new(FrameQueue::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let q = queue.clone();
        let o = order.clone();
        queue.schedule_once(Box::new(move || {
            o.borrow_mut().push("first");
            let o2 = o.clone();
            q.schedule_once(Box::new(move || o2.borrow_mut().push("second")));
        }));

        assert_eq!(queue.run_frame(), 1);
        assert_eq!(*order.borrow(), vec!["first"]);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_frame(), 1);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn cancel_from_inside_a_running_frame() {
        let queue = Rc::new(FrameQueue::new());
        let (count, make) = counter();
        let victim: Rc<Cell<Option<FrameHandle>>> = Rc::new(Cell::new(None));

        let q = queue.clone();
        let v = victim.clone();
        queue.schedule_once(Box::new(move || {
            if let Some(handle) = v.get() {
                q.cancel(handle);
            }
        }));
        victim.set(Some(queue.schedule_once(make())));

        assert_eq!(queue.run_frame(), 1);
        assert_eq!(count.get(), 0);
    }
}
