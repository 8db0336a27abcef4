use std::sync::{Arc, Mutex, PoisonError};

use listmirror_shared::{ChangeEvent, ChangeObserver, KeyedSequence, MirrorError, SourceCancelled};

/// One call received by a [`RecordingObserver`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A diff, with the record count observed right after it
    Changed { event: ChangeEvent, count: usize },
    Cancelled(String),
    Failed(MirrorError),
}

/// Observer that logs every notification. Clones share the same log, so the
/// test keeps one handle and gives the other to the mirror.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    log: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the diffs, in delivery order
    pub fn changes(&self) -> Vec<ChangeEvent> {
        self.notifications()
            .into_iter()
            .filter_map(|notification| match notification {
                Notification::Changed { event, .. } => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, notification: Notification) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl<V> ChangeObserver<V> for RecordingObserver {
    fn on_changed(&mut self, event: &ChangeEvent, records: &KeyedSequence<V>) {
        self.push(Notification::Changed {
            event: *event,
            count: records.len(),
        });
    }

    fn on_cancelled(&mut self, cancelled: &SourceCancelled) {
        self.push(Notification::Cancelled(cancelled.reason.clone()));
    }

    fn on_failed(&mut self, error: &MirrorError) {
        self.push(Notification::Failed(error.clone()));
    }
}
