use thiserror::Error;

/// Errors that can occur while mirroring a remote ordered collection
///
/// Lookup failures (`PriorKeyNotFound`, `KeyNotFound`, `DuplicateKey`) mean the
/// local replica has diverged from the source: an upstream event was missed or
/// delivered out of order. Retrying the same event cannot help, the owner has
/// to resync with a fresh mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    // Event Application Errors (Source Inconsistency)

    /// Added/Moved event references a sibling key that is not held locally
    #[error("Prior key '{prior_key}' for record '{key}' not found in local sequence")]
    PriorKeyNotFound { key: String, prior_key: String },

    /// Changed/Removed/Moved event references a key that is not held locally
    #[error("Key '{key}' not found in local sequence during {operation}")]
    KeyNotFound {
        key: String,
        operation: &'static str,
    },

    /// Added event for a key that is already held locally
    #[error("Key '{key}' already present in local sequence")]
    DuplicateKey { key: String },

    // Caller Errors

    /// attach() called on a mirror that was already attached or detached
    #[error("Mirror is already attached to a source, or was detached and cannot be reused")]
    AlreadyAttached,

    /// get() called with an index outside [0, count)
    #[error("Index {index} out of range for sequence of {count} records")]
    IndexOutOfRange { index: usize, count: usize },

    // Internal Errors

    /// Mirror lock is poisoned (a panic occurred while holding it)
    #[error("Mirror lock is poisoned - this indicates a panic occurred while holding the lock")]
    LockPoisoned,

    /// Key index disagrees with the record sequence
    #[error("Internal sequence consistency error: {context}")]
    InternalConsistency { context: String },

    /// The source refused the subscription
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors reported by a [`RemoteOrderedSource`](crate::RemoteOrderedSource)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// Source was cancelled and accepts no further subscriptions
    #[error("Source was cancelled: {reason}")]
    Cancelled { reason: String },

    /// Source lock is poisoned
    #[error("Source lock is poisoned - this indicates a panic occurred while holding the lock")]
    LockPoisoned,
}

/// Terminal signal from a source: the stream failed and no further events
/// will be delivered (permission loss, connection teardown, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Source stream cancelled: {reason}")]
pub struct SourceCancelled {
    pub reason: String,
}

impl SourceCancelled {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<SourceCancelled> for SourceError {
    fn from(cancelled: SourceCancelled) -> Self {
        SourceError::Cancelled {
            reason: cancelled.reason,
        }
    }
}
