//! Frame-coalesced pointer and scroll tracking.
//!
//! Pointer-move and scroll events arrive far more often than the display
//! repaints. The coalescer records every raw sample but commits to
//! [`PageState`] at most once per frame per stream, always with the most
//! recent sample:
//!
//! ```text
//!   raw:     (1,1) (2,2) (3,3)  |            (4,4)  |
//!   frame:                      ▼ commit (3,3)      ▼ commit (4,4)
//! ```
//!
//! Each stream carries a pending handle. While it is set, new samples only
//! replace the latest value; no second commit is scheduled.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_protocol::Point;
use tracing::{debug, trace};

use crate::frame::{FrameHandle, FrameScheduler};
use crate::input::{InputSource, Subscription};
use crate::model::PageState;

/// One coalesced stream: the latest raw sample and the pending commit.
#[derive(Debug)]
struct Stream<T> {
    latest: Option<T>,
    /// `Some` exactly while a commit is queued.
    pending: Option<FrameHandle>,
    commits: u64,
}

impl<T> Default for Stream<T> {
    fn default() -> Self {
        Self {
            latest: None,
            pending: None,
            commits: 0,
        }
    }
}

struct Attached {
    pointer_source: Rc<dyn InputSource<Point>>,
    pointer_sub: Subscription,
    scroll_source: Rc<dyn InputSource<f64>>,
    scroll_sub: Subscription,
}

struct Inner {
    state: Rc<PageState>,
    scheduler: Rc<dyn FrameScheduler>,
    pointer: Stream<Point>,
    scroll: Stream<f64>,
    attached: Option<Attached>,
    torn_down: bool,
}

/// Coalesces raw pointer and scroll samples into per-frame state commits.
///
/// Cloning yields another handle to the same coalescer.
#[derive(Clone)]
pub struct ViewportCoalescer {
    inner: Rc<RefCell<Inner>>,
}

impl ViewportCoalescer {
    pub fn new(state: Rc<PageState>, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state,
                scheduler,
                pointer: Stream::default(),
                scroll: Stream::default(),
                attached: None,
                torn_down: false,
            })),
        }
    }

    /// Subscribe to raw pointer and scroll sources.
    ///
    /// Handlers hold only a weak reference, so a dropped coalescer never
    /// keeps receiving. Attaching again replaces the previous subscriptions.
    pub fn attach(
        &self,
        pointer_source: Rc<dyn InputSource<Point>>,
        scroll_source: Rc<dyn InputSource<f64>>,
    ) {
        if self.inner.borrow().torn_down {
            return;
        }
        self.detach();

        let weak = Rc::downgrade(&self.inner);
        let pointer_sub = pointer_source.subscribe(Box::new(move |p: Point| {
            if let Some(inner) = weak.upgrade() {
                record_pointer(&inner, p);
            }
        }));
        let weak = Rc::downgrade(&self.inner);
        let scroll_sub = scroll_source.subscribe(Box::new(move |offset: f64| {
            if let Some(inner) = weak.upgrade() {
                record_scroll(&inner, offset);
            }
        }));

        self.inner.borrow_mut().attached = Some(Attached {
            pointer_source,
            pointer_sub,
            scroll_source,
            scroll_sub,
        });
    }

    /// Record a raw pointer sample at viewport coordinates `(x, y)`.
    pub fn on_raw_pointer_event(&self, x: f64, y: f64) {
        record_pointer(&self.inner, Point::new(x, y));
    }

    /// Record a raw vertical scroll offset.
    pub fn on_raw_scroll_event(&self, offset: f64) {
        record_scroll(&self.inner, offset);
    }

    /// Unsubscribe from the raw sources and cancel outstanding commits.
    ///
    /// Idempotent. After teardown raw samples are ignored and no commit
    /// ever reaches the page state.
    pub fn teardown(&self) {
        let scheduler = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            inner.scheduler.clone()
        };
        self.detach();

        let (pointer_pending, scroll_pending) = {
            let mut inner = self.inner.borrow_mut();
            (inner.pointer.pending.take(), inner.scroll.pending.take())
        };
        for handle in [pointer_pending, scroll_pending].into_iter().flatten() {
            scheduler.cancel(handle);
        }
        debug!("viewport coalescer torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.borrow().torn_down
    }

    pub fn is_pointer_pending(&self) -> bool {
        self.inner.borrow().pointer.pending.is_some()
    }

    pub fn is_scroll_pending(&self) -> bool {
        self.inner.borrow().scroll.pending.is_some()
    }

    /// Pointer commits published so far.
    pub fn pointer_commits(&self) -> u64 {
        self.inner.borrow().pointer.commits
    }

    /// Scroll commits published so far.
    pub fn scroll_commits(&self) -> u64 {
        self.inner.borrow().scroll.commits
    }

    fn detach(&self) {
        // Take the subscriptions out first: unsubscribing must not happen
        // while `inner` is borrowed, in case the source dispatches.
        let attached = self.inner.borrow_mut().attached.take();
        if let Some(a) = attached {
            a.pointer_source.unsubscribe(a.pointer_sub);
            a.scroll_source.unsubscribe(a.scroll_sub);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for handle in [self.pointer.pending.take(), self.scroll.pending.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
        if let Some(a) = self.attached.take() {
            a.pointer_source.unsubscribe(a.pointer_sub);
            a.scroll_source.unsubscribe(a.scroll_sub);
        }
    }
}

impl std::fmt::Debug for ViewportCoalescer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ViewportCoalescer")
            .field("pointer", &inner.pointer)
            .field("scroll", &inner.scroll)
            .field("attached", &inner.attached.is_some())
            .field("torn_down", &inner.torn_down)
            .finish()
    }
}

fn record_pointer(inner: &Rc<RefCell<Inner>>, sample: Point) {
    record(inner, sample, |i| &mut i.pointer, commit_pointer);
}

fn record_scroll(inner: &Rc<RefCell<Inner>>, sample: f64) {
    record(inner, sample, |i| &mut i.scroll, commit_scroll);
}

fn record<T: Copy>(
    cell: &Rc<RefCell<Inner>>,
    sample: T,
    stream: fn(&mut Inner) -> &mut Stream<T>,
    commit: fn(&Rc<RefCell<Inner>>),
) {
    let mut inner = cell.borrow_mut();
    if inner.torn_down {
        return;
    }
    let s = stream(&mut inner);
    s.latest = Some(sample);
    if s.pending.is_some() {
        return;
    }

    let weak: Weak<RefCell<Inner>> = Rc::downgrade(cell);
    let handle = inner.scheduler.schedule_once(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            commit(&inner);
        }
    }));
    stream(&mut inner).pending = Some(handle);
}

fn commit_pointer(cell: &Rc<RefCell<Inner>>) {
    let mut inner = cell.borrow_mut();
    debug_assert!(!inner.torn_down, "pointer commit fired after teardown");
    if inner.torn_down {
        return;
    }
    if let Some(p) = inner.pointer.latest {
        inner.state.set_pointer(p);
        trace!(x = p.x, y = p.y, "pointer committed");
    }
    inner.pointer.pending = None;
    inner.pointer.commits += 1;
}

fn commit_scroll(cell: &Rc<RefCell<Inner>>) {
    let mut inner = cell.borrow_mut();
    debug_assert!(!inner.torn_down, "scroll commit fired after teardown");
    if inner.torn_down {
        return;
    }
    if let Some(offset) = inner.scroll.latest {
        inner.state.set_scroll_offset(offset);
        trace!(offset, "scroll committed");
    }
    inner.scroll.pending = None;
    inner.scroll.commits += 1;
}
