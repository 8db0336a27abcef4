//! # Listmirror Client
//! Maintains a local ordered replica of a remote keyed collection and reports
//! every applied mutation as a positional diff to a single observer.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use listmirror_shared::{
        ChangeEvent, ChangeKind, ChangeObserver, ChildEvent, ChildEventListener, ChildEventType,
        KeyLookup, KeyedRecord, KeyedSequence, ListenerId, MirrorError, RemoteOrderedSource,
        SourceCancelled, SourceError,
    };
}

mod mirror;
mod mirror_config;

pub use mirror::{mirror_state::MirrorState, ordered_mirror::OrderedMirror};
pub use mirror_config::MirrorConfig;
