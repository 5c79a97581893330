//! Explicit observer lists with subscription handles.
//!
//! Subscribers are invoked in subscription order. Handles are unique per list
//! and never reused, so a stale handle cannot unsubscribe a newer observer.

use core::fmt;

/// Handle returned by [`Observers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback<A> = Box<dyn FnMut(&A) + Send>;

/// An ordered list of callbacks notified with a shared argument.
pub struct Observers<A> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<A>)>,
}

impl<A> Observers<A> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&A) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed (or was already removed).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn notify(&mut self, arg: &A) {
        for (_, callback) in &mut self.subscribers {
            callback(arg);
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<A> Default for Observers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Observers<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
