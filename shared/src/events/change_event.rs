use std::fmt;

/// Kind of structural change applied to the local sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Changed,
    Removed,
    Moved,
}

/// Positional diff emitted once per applied event.
///
/// `index` refers to the sequence *after* the mutation, except for
/// `Removed`, where it is the position the record occupied before removal.
/// `prior_index` is only set for `Moved`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub index: usize,
    pub prior_index: Option<usize>,
}

impl ChangeEvent {
    pub fn added(index: usize) -> Self {
        Self {
            kind: ChangeKind::Added,
            index,
            prior_index: None,
        }
    }

    pub fn changed(index: usize) -> Self {
        Self {
            kind: ChangeKind::Changed,
            index,
            prior_index: None,
        }
    }

    pub fn removed(index: usize) -> Self {
        Self {
            kind: ChangeKind::Removed,
            index,
            prior_index: None,
        }
    }

    pub fn moved(index: usize, prior_index: usize) -> Self {
        Self {
            kind: ChangeKind::Moved,
            index,
            prior_index: Some(prior_index),
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prior_index {
            Some(prior_index) => write!(f, "{:?} {} -> {}", self.kind, prior_index, self.index),
            None => write!(f, "{:?} @ {}", self.kind, self.index),
        }
    }
}
