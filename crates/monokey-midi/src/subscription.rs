//! Listener registrations with explicit lifetimes.
//!
//! Every `on_*` registration returns a [`Subscription`]. Dropping it removes the
//! listener from its source; if the source is already gone, dropping is a no-op.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

type Detach = Box<dyn FnOnce() + Send>;

/// Guard for a registered listener.
#[must_use = "dropping a Subscription unregisters the listener"]
pub struct Subscription {
    detach: Option<Detach>,
}

impl Subscription {
    pub(crate) fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Unregister now. Same as dropping the guard.
    pub fn unsubscribe(self) {}

    /// Keep the listener registered for as long as its source lives.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

struct Entries<T> {
    next_id: u64,
    items: Vec<(u64, T)>,
}

/// Ordered set of listeners. Dispatch works on a snapshot so listeners may
/// subscribe or unsubscribe while being called.
pub(crate) struct Registry<T> {
    inner: Arc<Mutex<Entries<T>>>,
}

impl<T: Clone + Send + 'static> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Entries {
                next_id: 0,
                items: Vec::new(),
            })),
        }
    }

    pub(crate) fn insert(&self, item: T) -> Subscription {
        let id = {
            let mut entries = self.inner.lock();
            let id = entries.next_id;
            entries.next_id += 1;
            entries.items.push((id, item));
            id
        };

        let weak: Weak<Mutex<Entries<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.lock().items.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.inner
            .lock()
            .items
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().items.len()
    }
}
