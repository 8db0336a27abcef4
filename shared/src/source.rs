use std::{fmt, sync::Arc};

use crate::{ChildEvent, SourceCancelled, SourceError};

/// Identifies one subscription on a [`RemoteOrderedSource`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Receives the mutation stream of a [`RemoteOrderedSource`].
///
/// Events for a given key arrive in the order the source's canonical state
/// changed. Sources may call in from any thread, hence `Send + Sync`.
pub trait ChildEventListener<V>: Send + Sync {
    fn on_child_event(&self, event: ChildEvent<V>);

    /// Terminal: no further events follow
    fn on_cancelled(&self, cancelled: &SourceCancelled);
}

/// A remote, event-sourced ordered collection that can be subscribed to
pub trait RemoteOrderedSource<V>: Send + Sync {
    /// Register `listener`. Implementations may deliver the current children
    /// as Added events before returning, so callers must not hold locks the
    /// listener needs.
    fn subscribe(&self, listener: Arc<dyn ChildEventListener<V>>) -> Result<ListenerId, SourceError>;

    /// Detach the listener. Unknown ids are ignored.
    fn unsubscribe(&self, listener_id: ListenerId);
}
