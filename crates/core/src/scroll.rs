//! The page's scroll container.
//!
//! [`SmoothScroller`] owns the raw scroll position. Every position change,
//! whether from a wheel, a jump, or a step of a smooth scroll, is emitted
//! as a raw scroll sample on its output channel, exactly like a browser's
//! `scroll` event. The coalescer picks the samples up from there.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use folio_protocol::SectionId;
use tracing::{debug, trace};

use crate::frame::{FrameHandle, FrameScheduler};
use crate::input::InputChannel;
use crate::model::PageLayout;
use crate::navigator::ScrollTarget;

/// Frames a smooth scroll takes from start to finish.
pub const SCROLL_FRAMES: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: f64,
    to: f64,
    step: u32,
}

impl Animation {
    /// Cubic ease-out position at the current step.
    fn position(&self) -> f64 {
        if self.done() {
            return self.to;
        }
        let t = f64::from(self.step) / f64::from(SCROLL_FRAMES);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    fn done(&self) -> bool {
        self.step >= SCROLL_FRAMES
    }
}

pub struct SmoothScroller {
    this: Weak<SmoothScroller>,
    layout: Rc<RefCell<PageLayout>>,
    scheduler: Rc<dyn FrameScheduler>,
    output: Rc<InputChannel<f64>>,
    offset: Cell<f64>,
    animation: Cell<Option<Animation>>,
    step_handle: Cell<Option<FrameHandle>>,
}

impl SmoothScroller {
    pub fn new(
        layout: Rc<RefCell<PageLayout>>,
        scheduler: Rc<dyn FrameScheduler>,
        output: Rc<InputChannel<f64>>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            layout,
            scheduler,
            output,
            offset: Cell::new(0.0),
            animation: Cell::new(None),
            step_handle: Cell::new(None),
        })
    }

    /// Current raw scroll offset. Runs ahead of the committed offset in
    /// [`PageState`](crate::model::PageState) by up to one frame.
    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.get().is_some()
    }

    /// Where the running animation will stop.
    pub fn destination(&self) -> Option<f64> {
        self.animation.get().map(|a| a.to)
    }

    /// Scroll by `delta` immediately, interrupting any smooth scroll.
    /// Non-finite deltas are ignored.
    pub fn scroll_by(&self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.cancel();
        self.jump(self.offset.get() + delta);
    }

    /// Jump to `offset` immediately, interrupting any smooth scroll.
    /// Non-finite offsets are ignored.
    pub fn scroll_to(&self, offset: f64) {
        if !offset.is_finite() {
            return;
        }
        self.cancel();
        self.jump(offset);
    }

    /// Stop a running smooth scroll where it is.
    pub fn cancel(&self) {
        if let Some(handle) = self.step_handle.take() {
            self.scheduler.cancel(handle);
        }
        if self.animation.take().is_some() {
            trace!(offset = self.offset.get(), "smooth scroll interrupted");
        }
    }

    /// Re-clamp after the layout changed (e.g. a resize).
    pub fn relayout(&self) {
        self.cancel();
        self.jump(self.offset.get());
    }

    /// `f64::clamp` passes NaN through; a non-finite target keeps the
    /// current offset.
    fn clamp(&self, offset: f64) -> f64 {
        if !offset.is_finite() {
            return self.offset.get();
        }
        offset.clamp(0.0, self.layout.borrow().max_offset())
    }

    fn jump(&self, offset: f64) {
        let offset = self.clamp(offset);
        if offset != self.offset.get() {
            self.set_offset(offset);
        }
    }

    fn set_offset(&self, offset: f64) {
        self.offset.set(offset);
        self.output.emit(offset);
    }

    fn schedule_step(&self) {
        let this = self.this.clone();
        let handle = self.scheduler.schedule_once(Box::new(move || {
            if let Some(scroller) = this.upgrade() {
                scroller.step();
            }
        }));
        self.step_handle.set(Some(handle));
    }

    fn step(&self) {
        self.step_handle.set(None);
        let Some(mut animation) = self.animation.get() else {
            return;
        };
        animation.step += 1;
        self.set_offset(animation.position());
        if animation.done() {
            self.animation.set(None);
            trace!(offset = animation.to, "smooth scroll finished");
        } else {
            self.animation.set(Some(animation));
            self.schedule_step();
        }
    }
}

impl ScrollTarget for SmoothScroller {
    fn section_top(&self, section: SectionId) -> Option<f64> {
        self.layout.borrow().section_top(section)
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.cancel();
        let to = self.clamp(top);
        let from = self.offset.get();
        if to == from {
            return;
        }
        debug!(from, to, "smooth scroll");
        self.animation.set(Some(Animation { from, to, step: 0 }));
        self.schedule_step();
    }
}

impl Drop for SmoothScroller {
    fn drop(&mut self) {
        if let Some(handle) = self.step_handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl std::fmt::Debug for SmoothScroller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothScroller")
            .field("offset", &self.offset.get())
            .field("animation", &self.animation.get())
            .finish_non_exhaustive()
    }
}
