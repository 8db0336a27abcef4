/// Type tag of a [`ChildEvent`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildEventType {
    Added,
    Changed,
    Removed,
    Moved,
}

// Source Mutation Events
//
// `prior_key` is the key of the immediately preceding sibling in the source's
// canonical order, `None` when the child is first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChildEvent<V> {
    Added {
        key: String,
        value: V,
        prior_key: Option<String>,
    },
    Changed {
        key: String,
        value: V,
        prior_key: Option<String>,
    },
    Removed {
        key: String,
        value: V,
    },
    Moved {
        key: String,
        value: V,
        prior_key: Option<String>,
    },
}

impl<V> ChildEvent<V> {
    pub fn added(key: impl Into<String>, value: V, prior_key: Option<&str>) -> Self {
        Self::Added {
            key: key.into(),
            value,
            prior_key: prior_key.map(str::to_string),
        }
    }

    pub fn changed(key: impl Into<String>, value: V, prior_key: Option<&str>) -> Self {
        Self::Changed {
            key: key.into(),
            value,
            prior_key: prior_key.map(str::to_string),
        }
    }

    pub fn removed(key: impl Into<String>, value: V) -> Self {
        Self::Removed {
            key: key.into(),
            value,
        }
    }

    pub fn moved(key: impl Into<String>, value: V, prior_key: Option<&str>) -> Self {
        Self::Moved {
            key: key.into(),
            value,
            prior_key: prior_key.map(str::to_string),
        }
    }

    pub fn to_type(&self) -> ChildEventType {
        match self {
            Self::Added { .. } => ChildEventType::Added,
            Self::Changed { .. } => ChildEventType::Changed,
            Self::Removed { .. } => ChildEventType::Removed,
            Self::Moved { .. } => ChildEventType::Moved,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Added { key, .. } => key,
            Self::Changed { key, .. } => key,
            Self::Removed { key, .. } => key,
            Self::Moved { key, .. } => key,
        }
    }

    /// Ordering hint carried by the event. An empty string means "first".
    pub fn prior_key(&self) -> Option<&str> {
        let prior_key = match self {
            Self::Added { prior_key, .. } => prior_key.as_deref(),
            Self::Changed { prior_key, .. } => prior_key.as_deref(),
            Self::Moved { prior_key, .. } => prior_key.as_deref(),
            Self::Removed { .. } => None,
        };
        prior_key.filter(|prior_key| !prior_key.is_empty())
    }

    pub fn log(&self) -> String {
        match self.prior_key() {
            Some(prior_key) => format!("{:?} '{}' after '{}'", self.to_type(), self.key(), prior_key),
            None => format!("{:?} '{}'", self.to_type(), self.key()),
        }
    }
}
