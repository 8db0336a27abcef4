//! # Listmirror Shared
//! Common functionality shared between listmirror-client & listmirror-server
//! crates: keyed records, the ordered key-indexed sequence, change events, and
//! the source / observer contracts.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod events;
mod observer;
mod sequence;
mod source;

pub use error::{MirrorError, SourceCancelled, SourceError};
pub use events::{
    change_event::{ChangeEvent, ChangeKind},
    child_event::{ChildEvent, ChildEventType},
};
pub use observer::ChangeObserver;
pub use sequence::{key_lookup::KeyLookup, keyed_record::KeyedRecord, keyed_sequence::KeyedSequence};
pub use source::{ChildEventListener, ListenerId, RemoteOrderedSource};
