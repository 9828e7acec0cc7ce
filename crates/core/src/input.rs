//! Raw input sources.
//!
//! Frontends translate their native events (crossterm mouse events, egui
//! pointer state, DOM `mousemove`/`scroll`) into samples and [`emit`] them on
//! an [`InputChannel`]. Consumers subscribe through the [`InputSource`]
//! capability and keep the returned [`Subscription`] for teardown.
//!
//! [`emit`]: InputChannel::emit

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

pub type InputHandler<T> = Box<dyn FnMut(T)>;

/// Token returned by [`InputSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subscription(u64);

/// Subscribe/unsubscribe capability over a stream of samples of type `T`.
pub trait InputSource<T> {
    fn subscribe(&self, handler: InputHandler<T>) -> Subscription;

    /// Remove a handler. Unknown or already-removed subscriptions are ignored.
    fn unsubscribe(&self, subscription: Subscription);
}

/// A synchronous fan-out channel: every [`emit`](Self::emit) calls each
/// subscribed handler immediately, in subscription order.
pub struct InputChannel<T> {
    next_id: Cell<u64>,
    handlers: RefCell<BTreeMap<Subscription, Rc<RefCell<InputHandler<T>>>>>,
}

impl<T: Copy> InputChannel<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(BTreeMap::new()),
        }
    }

    /// Deliver `sample` to every current subscriber.
    ///
    /// Handlers may subscribe or unsubscribe from within the callback; a
    /// handler removed during dispatch is not called afterwards, and a
    /// handler added during dispatch first sees the next sample.
    pub fn emit(&self, sample: T) {
        let targets: Vec<Subscription> = self.handlers.borrow().keys().copied().collect();
        for subscription in targets {
            let handler = self.handlers.borrow().get(&subscription).cloned();
            let Some(handler) = handler else {
                continue;
            };
            // A handler that re-emits on its own channel would re-borrow
            // itself; skip it rather than recurse.
            let Ok(mut handler) = handler.try_borrow_mut() else {
                continue;
            };
            (*handler)(sample);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl<T: Copy> Default for InputChannel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> InputSource<T> for InputChannel<T> {
    fn subscribe(&self, handler: InputHandler<T>) -> Subscription {
        let subscription = Subscription(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.handlers
            .borrow_mut()
            .insert(subscription, Rc::new(RefCell::new(handler)));
        subscription
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.handlers.borrow_mut().remove(&subscription);
    }
}

impl<T> std::fmt::Debug for InputChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputChannel")
            .field("subscribers", &self.handlers.borrow().len())
            .finish()
    }
}
