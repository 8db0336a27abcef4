use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, trace, warn};

use listmirror_shared::{
    ChangeEvent, ChangeObserver, ChildEvent, KeyedSequence, MirrorError, SourceCancelled,
};

use crate::{mirror::mirror_state::MirrorState, MirrorConfig};

/// State guarded by the mirror lock: the replica, the observer slot and the
/// lifecycle. Every event goes through here one at a time.
pub(crate) struct MirrorCore<V> {
    sequence: KeyedSequence<V>,
    observer: Option<Box<dyn ChangeObserver<V>>>,
    state: MirrorState,
    last_error: Option<MirrorError>,
    isolate_observer_panics: bool,
}

impl<V> MirrorCore<V> {
    pub(crate) fn new(config: &MirrorConfig) -> Self {
        Self {
            sequence: KeyedSequence::with_lookup(config.key_lookup),
            observer: None,
            state: MirrorState::Idle,
            last_error: None,
            isolate_observer_panics: config.isolate_observer_panics,
        }
    }

    pub(crate) fn sequence(&self) -> &KeyedSequence<V> {
        &self.sequence
    }

    pub(crate) fn state(&self) -> MirrorState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: MirrorState) {
        if self.state != state {
            debug!("mirror state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub(crate) fn last_error(&self) -> Option<&MirrorError> {
        self.last_error.as_ref()
    }

    /// Replaces the observer slot, dropping any previous observer
    pub(crate) fn set_observer(&mut self, observer: Option<Box<dyn ChangeObserver<V>>>) {
        self.observer = observer;
    }

    /// Entry point for the attached stream. Failures fault the mirror and are
    /// reported to the observer, there is no caller to return them to.
    pub(crate) fn receive_event(&mut self, event: ChildEvent<V>) {
        if !self.state.accepts_events() {
            debug!("discarding {} on {:?} mirror", event.log(), self.state);
            return;
        }
        // the error has already been logged and delivered by `apply_event`
        let _ = self.apply_event(event);
    }

    /// Apply one event, notify the observer, and fault on inconsistency.
    ///
    /// The caller is responsible for checking `state.accepts_events()`.
    pub(crate) fn apply_event(&mut self, event: ChildEvent<V>) -> Result<ChangeEvent, MirrorError> {
        let event_type = event.to_type();
        match self.sequence.apply_event(event) {
            Ok(change) => {
                trace!("applied {:?}: {}", event_type, change);
                self.notify(|observer, records| observer.on_changed(&change, records));
                Ok(change)
            }
            Err(mirror_error) => {
                self.fault(mirror_error.clone());
                Err(mirror_error)
            }
        }
    }

    pub(crate) fn receive_cancelled(&mut self, cancelled: &SourceCancelled) {
        if self.state != MirrorState::Live {
            debug!("ignoring cancellation on {:?} mirror: {}", self.state, cancelled);
            return;
        }
        warn!("{}, mirror stops applying events", cancelled);
        self.set_state(MirrorState::Cancelled);
        self.notify(|observer, _| observer.on_cancelled(cancelled));
    }

    fn fault(&mut self, mirror_error: MirrorError) {
        error!("mirror diverged from source, discarding further events: {}", mirror_error);
        self.set_state(MirrorState::Faulted);
        self.notify(|observer, _| observer.on_failed(&mirror_error));
        self.last_error = Some(mirror_error);
    }

    fn notify<F>(&mut self, notify_fn: F)
    where
        F: FnOnce(&mut dyn ChangeObserver<V>, &KeyedSequence<V>),
    {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        let records = &self.sequence;

        if !self.isolate_observer_panics {
            notify_fn(observer.as_mut(), records);
            return;
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| notify_fn(observer.as_mut(), records)));
        if result.is_err() {
            warn!("observer panicked during notification, mirror state is unaffected");
        }
    }
}
