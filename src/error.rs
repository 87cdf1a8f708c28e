use thiserror::Error;

/// Error type returned by action handlers and coordinators.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by a [`Store`](crate::Store).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state update must be a JSON object or null, got {kind}")]
    InvalidPartial { kind: &'static str },

    #[error("store {store} is already handling {active}; nested dispatch of {attempted} rejected")]
    Reentrant {
        store: String,
        active: String,
        attempted: String,
    },

    #[error("handler for {action} in store {store} failed")]
    Handler {
        store: String,
        action: String,
        #[source]
        source: HandlerError,
    },

    #[error("store {store} has no dispatcher attached to wait on")]
    NoCoordinator { store: String },

    #[error("waiting on other stores failed")]
    WaitFor(#[source] HandlerError),
}
