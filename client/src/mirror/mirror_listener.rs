use std::sync::{Mutex, Weak};

use log::{debug, error};

use listmirror_shared::{ChildEvent, ChildEventListener, SourceCancelled};

use crate::mirror::mirror_core::MirrorCore;

// MirrorListener
//
// What the mirror hands to its source. Holds the core weakly so a source that
// outlives the mirror only ever reaches a dead handle.
pub(crate) struct MirrorListener<V> {
    core: Weak<Mutex<MirrorCore<V>>>,
}

impl<V> MirrorListener<V> {
    pub(crate) fn new(core: Weak<Mutex<MirrorCore<V>>>) -> Self {
        Self { core }
    }
}

impl<V: Send> ChildEventListener<V> for MirrorListener<V> {
    fn on_child_event(&self, event: ChildEvent<V>) {
        let Some(core) = self.core.upgrade() else {
            debug!("mirror dropped, discarding {}", event.log());
            return;
        };
        let Ok(mut core) = core.lock() else {
            error!("mirror lock poisoned, discarding {}", event.log());
            return;
        };
        core.receive_event(event);
    }

    fn on_cancelled(&self, cancelled: &SourceCancelled) {
        let Some(core) = self.core.upgrade() else {
            return;
        };
        let Ok(mut core) = core.lock() else {
            error!("mirror lock poisoned, discarding cancellation: {}", cancelled);
            return;
        };
        core.receive_cancelled(cancelled);
    }
}
