/// A single mirrored item: a unique key and an opaque payload.
///
/// Records are never edited in place. A Changed event swaps in a new value,
/// which is the only mutation the owning sequence performs on a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyedRecord<V> {
    key: String,
    value: V,
}

impl<V> KeyedRecord<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (String, V) {
        (self.key, self.value)
    }

    pub(crate) fn replace_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}
