use crate::state::{merge_into, StateMap};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

/// A state update issued by a handler.
#[derive(Debug)]
pub(crate) enum Update {
    Merge(StateMap),
    Replace(StateMap),
}

impl Update {
    pub(crate) fn apply_to(self, target: &mut StateMap) {
        match self {
            Update::Merge(partial) => merge_into(target, partial),
            Update::Replace(full) => *target = full,
        }
    }
}

/// Where an update ended up.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Applied {
    /// Folded into the active cycle, committed when it ends.
    Pending,
    /// No cycle was active; written straight to committed state.
    Committed,
}

/// Bookkeeping for one action being handled.
#[derive(Debug)]
struct DispatchCycle {
    action: String,
    pending: StateMap,
    should_emit: bool,
}

/// Committed state plus the active dispatch cycle, if any.
///
/// Every write to committed state happens while the slot mutex is held, so a
/// cycle's seed and its commit can never interleave with another writer.
/// Lock order is slot, then committed.
#[derive(Debug, Default)]
pub(crate) struct CycleSlot {
    slot: Mutex<Option<DispatchCycle>>,
    committed: RwLock<Option<StateMap>>,
}

impl CycleSlot {
    fn lock(&self) -> MutexGuard<'_, Option<DispatchCycle>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of committed state, `None` while unset.
    pub(crate) fn committed(&self) -> Option<StateMap> {
        self.committed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.committed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Open a cycle seeded with the committed state.
    ///
    /// Fails with the name of the action already being handled.
    pub(crate) fn begin(&self, action: String) -> Result<(), String> {
        let mut slot = self.lock();
        if let Some(active) = slot.as_ref() {
            return Err(active.action.clone());
        }
        *slot = Some(DispatchCycle {
            action,
            pending: self.committed().unwrap_or_default(),
            should_emit: false,
        });
        Ok(())
    }

    pub(crate) fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Fold `update` into the active cycle, or into committed state when no
    /// cycle is active. Unset committed state is initialized either way.
    pub(crate) fn apply(&self, update: Update) -> Applied {
        let mut slot = self.lock();
        let mut committed = self
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let committed = committed.get_or_insert_with(StateMap::new);

        match slot.as_mut() {
            Some(cycle) => {
                update.apply_to(&mut cycle.pending);
                cycle.should_emit = true;
                Applied::Pending
            }
            None => {
                update.apply_to(committed);
                Applied::Committed
            }
        }
    }

    /// Close the active cycle, committing its pending state if anything was
    /// updated during it. Returns whether a commit happened.
    pub(crate) fn end(&self) -> bool {
        let mut slot = self.lock();
        let Some(cycle) = slot.take() else {
            return false;
        };
        if !cycle.should_emit {
            return false;
        }

        *self
            .committed
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(cycle.pending);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn map(value: Value) -> StateMap {
        crate::state::to_partial(value).unwrap()
    }

    fn seeded(value: Value) -> CycleSlot {
        let slot = CycleSlot::default();
        assert_eq!(slot.apply(Update::Replace(map(value))), Applied::Committed);
        slot
    }

    #[test]
    fn untouched_cycle_commits_nothing() {
        let slot = seeded(json!({ "a": 1 }));
        slot.begin("A".into()).unwrap();
        assert!(slot.is_active());

        assert!(!slot.end());
        assert!(!slot.is_active());
        assert_eq!(slot.committed(), Some(map(json!({ "a": 1 }))));
    }

    #[test]
    fn updates_accumulate_on_seed() {
        let slot = seeded(json!({ "a": 1 }));
        slot.begin("A".into()).unwrap();

        assert_eq!(slot.apply(Update::Merge(map(json!({ "b": 2 })))), Applied::Pending);
        slot.apply(Update::Merge(map(json!({ "a": 3 }))));
        assert_eq!(slot.committed(), Some(map(json!({ "a": 1 }))));

        assert!(slot.end());
        assert_eq!(slot.committed(), Some(map(json!({ "a": 3, "b": 2 }))));
    }

    #[test]
    fn replace_discards_seed() {
        let slot = seeded(json!({ "a": 1 }));
        slot.begin("A".into()).unwrap();

        slot.apply(Update::Replace(map(json!({ "x": 1 }))));
        slot.apply(Update::Merge(map(json!({ "y": 2 }))));

        assert!(slot.end());
        assert_eq!(slot.committed(), Some(map(json!({ "x": 1, "y": 2 }))));
    }

    #[test]
    fn empty_update_still_commits() {
        let slot = CycleSlot::default();
        slot.begin("A".into()).unwrap();
        slot.apply(Update::Merge(StateMap::new()));

        assert!(slot.end());
        assert_eq!(slot.committed(), Some(StateMap::new()));
    }

    #[test]
    fn update_initializes_unset_state() {
        let slot = CycleSlot::default();
        assert!(!slot.is_set());

        slot.begin("A".into()).unwrap();
        slot.apply(Update::Merge(map(json!({ "a": 1 }))));
        assert!(slot.is_set());
        assert_eq!(slot.committed(), Some(StateMap::new()));
    }

    #[test]
    fn second_begin_is_refused() {
        let slot = CycleSlot::default();
        slot.begin("OUTER".into()).unwrap();

        assert_eq!(slot.begin("INNER".into()), Err("OUTER".to_string()));

        slot.apply(Update::Merge(map(json!({ "kept": true }))));
        assert!(slot.end());
        assert_eq!(slot.committed(), Some(map(json!({ "kept": true }))));
    }

    #[test]
    fn apply_without_cycle_writes_committed() {
        let slot = CycleSlot::default();

        assert_eq!(slot.apply(Update::Merge(map(json!({ "a": 1 })))), Applied::Committed);
        assert_eq!(slot.committed(), Some(map(json!({ "a": 1 }))));
    }
}
