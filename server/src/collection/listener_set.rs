use std::sync::Arc;

use listmirror_shared::{ChildEvent, ChildEventListener, ListenerId, SourceCancelled};

// ListenerSet
//
// Subscribed listeners in subscription order. Each broadcast clones the
// payload once per listener.
pub(crate) struct ListenerSet<V> {
    listeners: Vec<(ListenerId, Arc<dyn ChildEventListener<V>>)>,
    next_id: u64,
}

impl<V: Clone> ListenerSet<V> {
    pub(crate) fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn next_id(&mut self) -> ListenerId {
        let listener_id = ListenerId::new(self.next_id);
        self.next_id += 1;
        listener_id
    }

    pub(crate) fn insert(&mut self, listener_id: ListenerId, listener: Arc<dyn ChildEventListener<V>>) {
        self.listeners.push((listener_id, listener));
    }

    pub(crate) fn remove(&mut self, listener_id: &ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| id != listener_id);
        self.listeners.len() != before
    }

    pub(crate) fn broadcast(&self, event: ChildEvent<V>) {
        let Some(((_, last), rest)) = self.listeners.split_last() else {
            return;
        };
        for (_, listener) in rest {
            listener.on_child_event(event.clone());
        }
        last.on_child_event(event);
    }

    /// Delivers the terminal signal and forgets every listener
    pub(crate) fn cancel_all(&mut self, cancelled: &SourceCancelled) {
        for (_, listener) in self.listeners.drain(..) {
            listener.on_cancelled(cancelled);
        }
    }
}
