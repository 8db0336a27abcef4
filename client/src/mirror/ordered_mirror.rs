use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use listmirror_shared::{
    ChangeEvent, ChangeObserver, ChildEvent, ChildEventListener, KeyedRecord, KeyedSequence,
    ListenerId, MirrorError, RemoteOrderedSource,
};

use crate::{
    mirror::{mirror_core::MirrorCore, mirror_listener::MirrorListener, mirror_state::MirrorState},
    MirrorConfig,
};

enum Attachment<V> {
    Unattached,
    Attached {
        source: Arc<dyn RemoteOrderedSource<V>>,
        listener_id: ListenerId,
    },
    Detached,
}

/// Local ordered replica of a remote keyed collection.
///
/// Attach it to a [`RemoteOrderedSource`]; every event the source delivers is
/// applied to the local sequence and reported to the observer as one
/// [`ChangeEvent`]. Events may be delivered from any thread, they are
/// serialized by the mirror lock.
///
/// An instance is attached at most once. After `detach`, a source
/// cancellation, or a fault, the instance stops applying events and a fresh
/// mirror is needed to resync.
pub struct OrderedMirror<V: Send + 'static> {
    core: Arc<Mutex<MirrorCore<V>>>,
    attachment: Attachment<V>,
    config: MirrorConfig,
}

impl<V: Send + 'static> OrderedMirror<V> {
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            core: Arc::new(Mutex::new(MirrorCore::new(&config))),
            attachment: Attachment::Unattached,
            config,
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    // Lifecycle

    /// Subscribe to `source`.
    ///
    /// Returns `AlreadyAttached` if this instance was attached or detached
    /// before, and `Source` if the source refuses the subscription (the mirror
    /// then stays attachable).
    pub fn attach(&mut self, source: Arc<dyn RemoteOrderedSource<V>>) -> Result<(), MirrorError> {
        if !matches!(self.attachment, Attachment::Unattached) {
            return Err(MirrorError::AlreadyAttached);
        }

        // Live before subscribing: the source may replay its children
        // synchronously from inside `subscribe`
        self.lock()?.set_state(MirrorState::Live);

        let listener: Arc<dyn ChildEventListener<V>> =
            Arc::new(MirrorListener::new(Arc::downgrade(&self.core)));

        match source.subscribe(listener) {
            Ok(listener_id) => {
                debug!("mirror attached to source as {}", listener_id);
                self.attachment = Attachment::Attached {
                    source,
                    listener_id,
                };
                Ok(())
            }
            Err(source_error) => {
                warn!("source refused subscription: {}", source_error);
                let mut core = self.lock()?;
                if core.state() == MirrorState::Live {
                    core.set_state(MirrorState::Idle);
                }
                Err(source_error.into())
            }
        }
    }

    /// Unsubscribe from the source. Idempotent; also runs on drop.
    ///
    /// Once this returns no diff or terminal notification is delivered any
    /// more, even for events the source still has in flight. The instance
    /// cannot be attached again.
    pub fn detach(&mut self) {
        let attachment = std::mem::replace(&mut self.attachment, Attachment::Detached);

        // silence the listener first, then tell the source
        self.lock_recovering().set_state(MirrorState::Detached);

        if let Attachment::Attached {
            source,
            listener_id,
        } = attachment
        {
            source.unsubscribe(listener_id);
            debug!("mirror detached {} from source", listener_id);
        }
    }

    pub fn state(&self) -> MirrorState {
        self.lock_recovering().state()
    }

    /// The inconsistency that faulted this mirror, if any
    pub fn last_error(&self) -> Option<MirrorError> {
        self.lock_recovering().last_error().cloned()
    }

    // Observer

    /// Install the single diff target, silently dropping the previous one
    pub fn set_observer(&self, observer: impl ChangeObserver<V> + 'static) {
        self.lock_recovering().set_observer(Some(Box::new(observer)));
    }

    pub fn clear_observer(&self) {
        self.lock_recovering().set_observer(None);
    }

    // Events

    /// Apply one event directly, for hosts that deliver events themselves.
    ///
    /// Goes through the same path as the attached stream: the observer is
    /// notified, and a lookup failure faults the mirror before being returned.
    /// Returns `Ok(None)` when the mirror no longer accepts events.
    pub fn apply(&self, event: ChildEvent<V>) -> Result<Option<ChangeEvent>, MirrorError> {
        let mut core = self.lock()?;
        if !core.state().accepts_events() {
            debug!("discarding {} on {:?} mirror", event.log(), core.state());
            return Ok(None);
        }
        core.apply_event(event).map(Some)
    }

    // Reads

    /// Number of mirrored records
    ///
    /// # Panics
    ///
    /// Panics if the mirror lock is poisoned.
    /// Consider using `try_count` for non-panicking error handling.
    pub fn count(&self) -> usize {
        self.try_count()
            .expect("Mirror lock is poisoned")
    }

    pub fn try_count(&self) -> Result<usize, MirrorError> {
        Ok(self.lock()?.sequence().len())
    }

    pub fn is_empty(&self) -> Result<bool, MirrorError> {
        Ok(self.lock()?.sequence().is_empty())
    }

    /// Clone of the record at `index`, `IndexOutOfRange` outside `[0, count)`
    pub fn get(&self, index: usize) -> Result<KeyedRecord<V>, MirrorError>
    where
        V: Clone,
    {
        self.lock()?.sequence().try_get(index).cloned()
    }

    pub fn position(&self, key: &str) -> Result<Option<usize>, MirrorError> {
        Ok(self.lock()?.sequence().position(key))
    }

    pub fn keys(&self) -> Result<Vec<String>, MirrorError> {
        Ok(self.lock()?.sequence().keys().map(str::to_string).collect())
    }

    /// Run `read_fn` against the current sequence while holding the lock
    pub fn with_records<R>(
        &self,
        read_fn: impl FnOnce(&KeyedSequence<V>) -> R,
    ) -> Result<R, MirrorError> {
        Ok(read_fn(self.lock()?.sequence()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MirrorCore<V>>, MirrorError> {
        self.core.lock().map_err(|_| MirrorError::LockPoisoned)
    }

    // Lifecycle fields stay valid even if a panic poisoned the lock
    fn lock_recovering(&self) -> MutexGuard<'_, MirrorCore<V>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Send + 'static> Default for OrderedMirror<V> {
    fn default() -> Self {
        Self::new(MirrorConfig::default())
    }
}

impl<V: Send + 'static> Drop for OrderedMirror<V> {
    fn drop(&mut self) {
        self.detach();
    }
}
