use thiserror::Error;

/// Errors that can occur while mutating an OrderedCollection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// remove() called for a key the collection does not hold
    #[error("Child '{key}' not found in collection")]
    KeyNotFound { key: String },

    /// Collection was cancelled and rejects further mutations
    #[error("Collection was cancelled: {reason}")]
    Cancelled { reason: String },

    /// Collection lock is poisoned
    #[error("Collection lock is poisoned - this indicates a panic occurred while holding the lock")]
    LockPoisoned,
}
