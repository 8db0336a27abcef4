use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

use listmirror_shared::{
    ChildEvent, ChildEventListener, ListenerId, RemoteOrderedSource, SourceCancelled, SourceError,
};

use crate::{collection::listener_set::ListenerSet, CollectionError};

struct Child<V> {
    key: String,
    value: V,
    priority: i64,
}

struct CollectionState<V> {
    // sorted by (priority, key)
    children: Vec<Child<V>>,
    listeners: ListenerSet<V>,
    cancelled: Option<String>,
}

impl<V: Clone> CollectionState<V> {
    fn position(&self, key: &str) -> Option<usize> {
        self.children.iter().position(|child| child.key == key)
    }

    fn prior_key(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .map(|prior_index| self.children[prior_index].key.as_str())
    }

    fn insertion_index(&self, key: &str, priority: i64) -> usize {
        self.children
            .partition_point(|child| (child.priority, child.key.as_str()) < (priority, key))
    }

    fn check_open(&self) -> Result<(), CollectionError> {
        match &self.cancelled {
            Some(reason) => Err(CollectionError::Cancelled {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn insert_child(&mut self, key: String, value: V, priority: i64) -> usize {
        let index = self.insertion_index(&key, priority);
        self.children.insert(
            index,
            Child {
                key,
                value,
                priority,
            },
        );
        index
    }

    fn add(&mut self, key: String, value: V, priority: i64) {
        let index = self.insert_child(key.clone(), value.clone(), priority);
        let event = ChildEvent::added(key, value, self.prior_key(index));
        trace!("broadcasting {}", event.log());
        self.listeners.broadcast(event);
    }
}

/// In-memory canonical ordered collection.
///
/// Children are ordered by `(priority, key)`; with the default priority of 0
/// the order is plain key order. Every mutation is streamed to subscribed
/// listeners as [`ChildEvent`]s carrying the key of the preceding sibling.
///
/// Listeners are called while the collection is locked, so each one sees a
/// single serialized stream. A listener must not call back into the
/// collection.
pub struct OrderedCollection<V> {
    state: Mutex<CollectionState<V>>,
}

impl<V: Clone + Send + 'static> OrderedCollection<V> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CollectionState {
                children: Vec::new(),
                listeners: ListenerSet::new(),
                cancelled: None,
            }),
        }
    }

    /// Add a child with the default priority, or replace the value of an
    /// existing child in place
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<(), CollectionError> {
        let key = key.into();
        let mut state = self.lock()?;
        state.check_open()?;

        let Some(index) = state.position(&key) else {
            state.add(key, value, 0);
            return Ok(());
        };

        state.children[index].value = value.clone();
        let event = ChildEvent::changed(key, value, state.prior_key(index));
        trace!("broadcasting {}", event.log());
        state.listeners.broadcast(event);
        Ok(())
    }

    /// Add a child, or replace an existing child's value and priority.
    ///
    /// Repositioning emits Moved when the preceding sibling changes,
    /// followed by Changed.
    pub fn set_with_priority(
        &self,
        key: impl Into<String>,
        value: V,
        priority: i64,
    ) -> Result<(), CollectionError> {
        let key = key.into();
        let mut state = self.lock()?;
        state.check_open()?;

        let Some(old_index) = state.position(&key) else {
            state.add(key, value, priority);
            return Ok(());
        };

        let old_prior_key = state.prior_key(old_index).map(str::to_string);
        state.children.remove(old_index);
        let new_index = state.insert_child(key.clone(), value.clone(), priority);
        let new_prior_key = state.prior_key(new_index).map(str::to_string);

        if new_prior_key != old_prior_key {
            let event = ChildEvent::moved(key.clone(), value.clone(), new_prior_key.as_deref());
            trace!("broadcasting {}", event.log());
            state.listeners.broadcast(event);
        }
        let event = ChildEvent::changed(key, value, new_prior_key.as_deref());
        trace!("broadcasting {}", event.log());
        state.listeners.broadcast(event);
        Ok(())
    }

    /// Remove a child, returning its value
    pub fn remove(&self, key: &str) -> Result<V, CollectionError> {
        let mut state = self.lock()?;
        state.check_open()?;

        let index = state
            .position(key)
            .ok_or_else(|| CollectionError::KeyNotFound {
                key: key.to_string(),
            })?;
        let child = state.children.remove(index);

        let event = ChildEvent::removed(child.key, child.value.clone());
        trace!("broadcasting {}", event.log());
        state.listeners.broadcast(event);
        Ok(child.value)
    }

    /// End the stream for every listener. Later mutations and subscriptions
    /// are rejected. Cancelling twice is a no-op.
    pub fn cancel(&self, reason: impl Into<String>) {
        let mut state = self.lock_recovering();
        if state.cancelled.is_some() {
            return;
        }
        let cancelled = SourceCancelled::new(reason);
        warn!("cancelling collection with {} listeners: {}", state.listeners.len(), cancelled);
        state.cancelled = Some(cancelled.reason.clone());
        state.listeners.cancel_all(&cancelled);
    }

    // Reads

    pub fn len(&self) -> usize {
        self.lock_recovering().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_recovering().children.is_empty()
    }

    /// Keys in canonical order
    pub fn keys(&self) -> Vec<String> {
        self.lock_recovering()
            .children
            .iter()
            .map(|child| child.key.clone())
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let state = self.lock_recovering();
        state
            .position(key)
            .map(|index| state.children[index].value.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.lock_recovering().listeners.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock_recovering().cancelled.is_some()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CollectionState<V>>, CollectionError> {
        self.state.lock().map_err(|_| CollectionError::LockPoisoned)
    }

    fn lock_recovering(&self) -> MutexGuard<'_, CollectionState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone + Send + 'static> Default for OrderedCollection<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + 'static> RemoteOrderedSource<V> for OrderedCollection<V> {
    /// Replays every current child as Added, in canonical order, before
    /// returning
    fn subscribe(&self, listener: Arc<dyn ChildEventListener<V>>) -> Result<ListenerId, SourceError> {
        let mut state = self.state.lock().map_err(|_| SourceError::LockPoisoned)?;
        if let Some(reason) = &state.cancelled {
            return Err(SourceError::Cancelled {
                reason: reason.clone(),
            });
        }

        for (index, child) in state.children.iter().enumerate() {
            listener.on_child_event(ChildEvent::added(
                child.key.clone(),
                child.value.clone(),
                state.prior_key(index),
            ));
        }

        let listener_id = state.listeners.next_id();
        state.listeners.insert(listener_id, listener);
        debug!("{} subscribed, replayed {} children", listener_id, state.children.len());
        Ok(listener_id)
    }

    fn unsubscribe(&self, listener_id: ListenerId) {
        if self.lock_recovering().listeners.remove(&listener_id) {
            debug!("{} unsubscribed", listener_id);
        }
    }
}
