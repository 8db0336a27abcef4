use std::default::Default;

use listmirror_shared::KeyLookup;

/// Contains Config properties which will be used by an OrderedMirror
#[derive(Clone, Debug)]
pub struct MirrorConfig {
    /// How keys are resolved to indices. `KeyIndex` keeps a key -> index map
    /// next to the record sequence, `LinearScan` walks the sequence.
    pub key_lookup: KeyLookup,
    /// Catch panics raised by the observer so that a failing consumer cannot
    /// poison the mirror. The panic is logged and the diff is considered
    /// delivered.
    pub isolate_observer_panics: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            key_lookup: KeyLookup::KeyIndex,
            isolate_observer_panics: true,
        }
    }
}
