use crate::dispatch::Coordinator;
use std::fmt;
use std::sync::Arc;

/// Construction options for a [`Store`](crate::Store).
#[derive(Clone, Default)]
pub struct StoreConfig {
    /// Used in log lines and errors. Defaults to the store id.
    pub name: Option<String>,
    /// Dispatcher hook used by `wait_for`.
    pub coordinator: Option<Arc<dyn Coordinator>>,
}

impl StoreConfig {
    /// Default options: generated name, no dispatcher hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the store name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the dispatcher hook used by `wait_for`.
    pub fn coordinator(mut self, coordinator: Arc<dyn Coordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("name", &self.name)
            .field("coordinator", &self.coordinator.is_some())
            .finish()
    }
}
