use super::config::StoreConfig;
use super::cycle::{Applied, CycleSlot, Update};
use super::id::StoreId;
use crate::action::{ActionKey, Payload};
use crate::dispatch::{Coordinator, WaitTarget};
use crate::error::{HandlerError, StoreError};
use crate::event::{ChangeEmitter, StoreEvent, Subscription};
use crate::state::{to_partial, StateMap};
use log::{debug, trace, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Handler<K, B> = Arc<dyn Fn(&Store<K, B>, &B, &K) -> Result<(), HandlerError> + Send + Sync>;

struct StoreInner<K, B> {
    id: StoreId,
    name: String,
    cycle: CycleSlot,
    handlers: RwLock<HashMap<K, Handler<K, B>>>,
    emitter: ChangeEmitter,
    coordinator: RwLock<Option<Arc<dyn Coordinator>>>,
}

/// A Flux store.
///
/// Holds a map of state that changes only in response to dispatched actions.
/// Handlers registered per action may call [`set_state`](Store::set_state) and
/// [`replace_state`](Store::replace_state) any number of times; the result is
/// committed once the handler returns and listeners get a single `change`
/// event.
///
/// `Store` is a handle: clones share the same state, handlers and listeners.
///
/// # Examples
///
/// ```
/// use flux_store::{Payload, Store};
/// use serde_json::json;
///
/// #[derive(Clone, Debug, PartialEq, Eq, Hash)]
/// enum Action {
///     Add,
/// }
///
/// let store: Store<Action> = Store::new();
/// store.register(Action::Add, |store, _body, _action| {
///     let count = store.get_state().get("count").and_then(|v| v.as_i64()).unwrap_or(0);
///     store.set_state(json!({ "count": count + 1 }))?;
///     Ok(())
/// });
///
/// store.handle(&Payload::new(Action::Add, json!({}))).unwrap();
/// assert_eq!(store.get_state()["count"], 1);
/// ```
pub struct Store<K, B = Value> {
    inner: Arc<StoreInner<K, B>>,
}

impl<K: ActionKey, B: 'static> Store<K, B> {
    /// Create a store with unset state and no handlers.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store with the given name and dispatcher hook.
    pub fn with_config(config: StoreConfig) -> Self {
        let id = StoreId::next();
        let name = config.name.unwrap_or_else(|| id.to_string());

        Self {
            inner: Arc::new(StoreInner {
                id,
                name,
                cycle: CycleSlot::default(),
                handlers: RwLock::new(HashMap::new()),
                emitter: ChangeEmitter::new(),
                coordinator: RwLock::new(config.coordinator),
            }),
        }
    }

    /// Process-unique id, usable as a [`WaitTarget`].
    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    /// Name used in log lines and errors.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Copy of the committed state. Empty if nothing was ever set.
    pub fn get_state(&self) -> StateMap {
        self.inner.cycle.committed().unwrap_or_default()
    }

    /// Whether the state has been initialized by any update.
    pub fn has_state(&self) -> bool {
        self.inner.cycle.is_set()
    }

    /// Whether an action is being handled right now.
    pub fn is_dispatching(&self) -> bool {
        self.inner.cycle.is_active()
    }

    /// Merge `partial` over the state.
    ///
    /// Meant to be called from a handler. Outside of one the update is applied
    /// and broadcast immediately, and a warning is logged.
    pub fn set_state(&self, partial: Value) -> Result<(), StoreError> {
        let partial = to_partial(partial)?;
        self.apply(Update::Merge(partial), "set_state");
        Ok(())
    }

    /// Replace the whole state with `full`.
    ///
    /// Same handler rules as [`set_state`](Store::set_state).
    pub fn replace_state(&self, full: Value) -> Result<(), StoreError> {
        let full = to_partial(full)?;
        self.apply(Update::Replace(full), "replace_state");
        Ok(())
    }

    fn apply(&self, update: Update, primitive: &str) {
        if self.inner.cycle.apply(update) == Applied::Pending {
            return;
        }

        warn!(
            "{}() called on store {} from outside an action handler; \
             stores should only change in response to dispatched actions",
            primitive, self.inner.name
        );
        self.emit_change();
    }

    /// Route `action` to `handler`, replacing any handler already registered
    /// for it.
    ///
    /// `action` may be the key itself or anything convertible into it, such
    /// as an action descriptor carrying its key.
    pub fn register<A, F>(&self, action: A, handler: F)
    where
        A: Into<K>,
        F: Fn(&Store<K, B>, &B, &K) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let action = action.into();
        let replaced = self
            .inner
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(action.clone(), Arc::new(handler))
            .is_some();

        if replaced {
            debug!("store {}: replaced handler for {:?}", self.inner.name, action);
        } else {
            debug!("store {}: registered handler for {:?}", self.inner.name, action);
        }
    }

    /// Install the dispatcher hook used by [`wait_for`](Store::wait_for).
    pub fn attach_coordinator(&self, coordinator: Arc<dyn Coordinator>) {
        *self
            .inner
            .coordinator
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(coordinator);
    }

    /// Block the current handler until the targets have handled the action.
    pub fn wait_for(&self, targets: &[WaitTarget]) -> Result<(), StoreError> {
        let coordinator = self
            .inner
            .coordinator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| StoreError::NoCoordinator {
                store: self.inner.name.clone(),
            })?;

        coordinator.wait_for(targets).map_err(StoreError::WaitFor)
    }

    /// Process one dispatched action.
    ///
    /// Runs the handler registered for `payload.action_id`, if any, then
    /// commits whatever it updated and emits one `change` event. The commit
    /// also happens when the handler fails or panics; the error is returned
    /// and the panic resumed afterwards.
    ///
    /// Fails with [`StoreError::Reentrant`] if this store is already handling
    /// an action.
    pub fn handle(&self, payload: &Payload<K, B>) -> Result<(), StoreError> {
        let action = format!("{:?}", payload.action_id);

        let outcome = {
            let _cycle = self.begin_cycle(&action)?;

            let handler = self
                .inner
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&payload.action_id)
                .cloned();

            match handler {
                Some(handler) => panic::catch_unwind(AssertUnwindSafe(|| {
                    handler(self, &payload.body, &payload.action_id)
                })),
                None => {
                    trace!("store {}: no handler for {}", self.inner.name, action);
                    Ok(Ok(()))
                }
            }
        };

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(StoreError::Handler {
                store: self.inner.name.clone(),
                action,
                source,
            }),
            Err(cause) => panic::resume_unwind(cause),
        }
    }

    fn begin_cycle(&self, action: &str) -> Result<CycleGuard<'_, K, B>, StoreError> {
        if let Err(active) = self.inner.cycle.begin(action.to_string()) {
            warn!(
                "store {}: rejected nested dispatch of {} while handling {}",
                self.inner.name, action, active
            );
            return Err(StoreError::Reentrant {
                store: self.inner.name.clone(),
                active,
                attempted: action.to_string(),
            });
        }

        trace!("store {}: handling {}", self.inner.name, action);
        Ok(CycleGuard { store: self })
    }

    fn end_cycle(&self) {
        if !self.inner.cycle.end() {
            return;
        }

        debug!("store {}: committed state, emitting {}", self.inner.name, StoreEvent::Change);
        self.emit_change();
    }

    fn emit_change(&self) {
        self.inner.emitter.emit();
    }

    /// Listen for `change` events. The listener stays registered until the
    /// returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.emitter.subscribe(listener)
    }

    /// Number of live `change` listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.emitter.listener_count()
    }

    /// Non-owning handle, for listeners that must not keep the store alive.
    pub fn downgrade(&self) -> WeakStore<K, B> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<K: ActionKey, B: 'static> Default for Store<K, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, B> Clone for Store<K, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, B> fmt::Debug for Store<K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("state", &self.inner.cycle.committed())
            .finish_non_exhaustive()
    }
}

/// Weak counterpart of [`Store`].
pub struct WeakStore<K, B = Value> {
    inner: Weak<StoreInner<K, B>>,
}

impl<K, B> WeakStore<K, B> {
    /// The store, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<Store<K, B>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<K, B> Clone for WeakStore<K, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Open dispatch cycle. Dropping it commits and closes the cycle.
struct CycleGuard<'a, K: ActionKey, B: 'static> {
    store: &'a Store<K, B>,
}

impl<K: ActionKey, B: 'static> Drop for CycleGuard<'_, K, B> {
    fn drop(&mut self) {
        self.store.end_cycle();
    }
}
