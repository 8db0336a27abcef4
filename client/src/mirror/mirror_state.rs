/// Lifecycle of an OrderedMirror
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MirrorState {
    /// Not attached yet. Events passed to `apply` are still accepted.
    Idle,
    /// Attached and applying the source's stream
    Live,
    /// The source reported a non-recoverable stream failure
    Cancelled,
    /// An event could not be applied; the replica may have diverged
    Faulted,
    /// Detached by its owner
    Detached,
}

impl MirrorState {
    pub fn accepts_events(&self) -> bool {
        matches!(self, MirrorState::Idle | MirrorState::Live)
    }

    pub fn is_terminal(&self) -> bool {
        !self.accepts_events()
    }
}
