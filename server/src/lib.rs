//! # Listmirror Server
//! An in-memory canonical ordered collection that streams ordering-hinted
//! child events to every subscribed listener, so mirrors can be driven end to
//! end without a remote store.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use listmirror_shared::{
        ChildEvent, ChildEventListener, ChildEventType, ListenerId, RemoteOrderedSource,
        SourceCancelled, SourceError,
    };
}

mod collection;
mod error;

pub use collection::ordered_collection::OrderedCollection;
pub use error::CollectionError;
