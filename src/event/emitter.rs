use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Events a store broadcasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    Change,
}

impl StoreEvent {
    /// Event name as emitted.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreEvent::Change => "change",
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct EmitterInner {
    next_id: AtomicUsize,
    listeners: RwLock<Vec<(usize, Listener)>>,
}

impl EmitterInner {
    fn remove(&self, id: usize) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Broadcasts the `change` event to every subscribed listener.
#[derive(Clone)]
pub struct ChangeEmitter {
    inner: Arc<EmitterInner>,
}

impl ChangeEmitter {
    /// Emitter with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                next_id: AtomicUsize::new(0),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Add a listener. It stays registered until the returned guard drops.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        Subscription {
            id,
            emitter: Arc::downgrade(&self.inner),
        }
    }

    /// Call every listener once.
    ///
    /// Listeners are snapshotted first so they may subscribe, unsubscribe or
    /// read the store while being notified.
    pub fn emit(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener();
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ChangeEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for a change listener.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: usize,
    emitter: Weak<EmitterInner>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(emitter) = self.emitter.upgrade() {
            emitter.remove(self.id);
        }
    }
}
