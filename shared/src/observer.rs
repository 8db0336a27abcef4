use crate::{ChangeEvent, KeyedSequence, MirrorError, SourceCancelled};

/// Single-slot diff target of a mirror.
///
/// Called synchronously, on whatever thread delivered the source event, while
/// the mirror is locked. `records` is the post-mutation sequence; read from it
/// rather than calling back into the mirror.
pub trait ChangeObserver<V>: Send {
    fn on_changed(&mut self, event: &ChangeEvent, records: &KeyedSequence<V>);

    /// The source stream ended for good. No diffs follow.
    fn on_cancelled(&mut self, _cancelled: &SourceCancelled) {}

    /// The mirror diverged from the source and stopped applying events.
    /// A fresh mirror is needed to resync.
    fn on_failed(&mut self, _error: &MirrorError) {}
}
