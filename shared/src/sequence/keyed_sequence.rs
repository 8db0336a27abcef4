use std::{
    collections::{HashMap, HashSet},
    ops::Range,
};

use crate::{ChangeEvent, ChildEvent, KeyLookup, KeyedRecord, MirrorError};

/// Ordered, key-unique sequence of [`KeyedRecord`]s rebuilt from
/// "insert after sibling" hints.
///
/// Every `apply_*` operation either mutates the sequence and returns the
/// resulting [`ChangeEvent`], or fails and leaves the sequence untouched.
/// With [`KeyLookup::KeyIndex`] the key -> index map is updated inside the same
/// call as the vector, so both always describe the same order.
pub struct KeyedSequence<V> {
    records: Vec<KeyedRecord<V>>,
    key_index: Option<HashMap<String, usize>>,
}

impl<V> KeyedSequence<V> {
    pub fn new() -> Self {
        Self::with_lookup(KeyLookup::default())
    }

    pub fn with_lookup(lookup: KeyLookup) -> Self {
        let key_index = match lookup {
            KeyLookup::LinearScan => None,
            KeyLookup::KeyIndex => Some(HashMap::new()),
        };
        Self {
            records: Vec::new(),
            key_index,
        }
    }

    pub fn lookup(&self) -> KeyLookup {
        if self.key_index.is_some() {
            KeyLookup::KeyIndex
        } else {
            KeyLookup::LinearScan
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyedRecord<V>> {
        self.records.get(index)
    }

    /// Returns the record at `index`, or `IndexOutOfRange` outside `[0, len)`
    pub fn try_get(&self, index: usize) -> Result<&KeyedRecord<V>, MirrorError> {
        self.records.get(index).ok_or(MirrorError::IndexOutOfRange {
            index,
            count: self.records.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyedRecord<V>> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(KeyedRecord::key)
    }

    /// Current index of the record with `key`
    pub fn position(&self, key: &str) -> Option<usize> {
        match &self.key_index {
            Some(key_index) => key_index.get(key).copied(),
            None => self.records.iter().position(|record| record.key() == key),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Apply one source event, dispatching on its type.
    ///
    /// A Moved event's payload replaces the record's value at its new
    /// position; only the single Moved diff is reported.
    pub fn apply_event(&mut self, event: ChildEvent<V>) -> Result<ChangeEvent, MirrorError> {
        match event {
            ChildEvent::Added {
                key,
                value,
                prior_key,
            } => self.apply_added(key, value, prior_key.as_deref()),
            ChildEvent::Changed { key, value, .. } => self.apply_changed(&key, value),
            ChildEvent::Removed { key, .. } => self.apply_removed(&key),
            ChildEvent::Moved {
                key,
                value,
                prior_key,
            } => {
                let change = self.apply_moved(&key, prior_key.as_deref())?;
                self.records[change.index].replace_value(value);
                Ok(change)
            }
        }
    }

    /// Insert a new record directly after `prior_key`, or first when
    /// `prior_key` is absent
    pub fn apply_added(
        &mut self,
        key: impl Into<String>,
        value: V,
        prior_key: Option<&str>,
    ) -> Result<ChangeEvent, MirrorError> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(MirrorError::DuplicateKey { key });
        }
        let index = self.insertion_index(&key, prior_key)?;

        self.records.insert(index, KeyedRecord::new(key, value));
        self.reindex(index..self.records.len());

        Ok(ChangeEvent::added(index))
    }

    /// Replace the value of an existing record; its index does not change
    pub fn apply_changed(&mut self, key: &str, value: V) -> Result<ChangeEvent, MirrorError> {
        let index = self.require_position(key, "change")?;
        self.records[index].replace_value(value);

        Ok(ChangeEvent::changed(index))
    }

    /// Remove a record; the event carries the index it occupied
    pub fn apply_removed(&mut self, key: &str) -> Result<ChangeEvent, MirrorError> {
        let index = self.require_position(key, "remove")?;

        self.records.remove(index);
        if let Some(key_index) = self.key_index.as_mut() {
            key_index.remove(key);
        }
        self.reindex(index..self.records.len());

        Ok(ChangeEvent::removed(index))
    }

    /// Reposition a record directly after `prior_key` (resolved once the
    /// record has been taken out), or first when `prior_key` is absent
    pub fn apply_moved(
        &mut self,
        key: &str,
        prior_key: Option<&str>,
    ) -> Result<ChangeEvent, MirrorError> {
        let old_index = self.require_position(key, "move")?;

        // validate everything before touching the vector
        let new_index = match non_empty(prior_key) {
            None => 0,
            Some(prior_key) => {
                let prior_index = self
                    .position(prior_key)
                    .filter(|_| prior_key != key)
                    .ok_or_else(|| MirrorError::PriorKeyNotFound {
                        key: key.to_string(),
                        prior_key: prior_key.to_string(),
                    })?;
                // the prior shifts left by one once the record is taken out
                if prior_index > old_index {
                    prior_index
                } else {
                    prior_index + 1
                }
            }
        };

        let record = self.records.remove(old_index);
        self.records.insert(new_index, record);
        self.reindex(old_index.min(new_index)..old_index.max(new_index) + 1);

        Ok(ChangeEvent::moved(new_index, old_index))
    }

    /// Verify that keys are unique and that the key index, when kept,
    /// agrees with the record order
    pub fn check_consistency(&self) -> Result<(), MirrorError> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for (index, record) in self.records.iter().enumerate() {
            if !seen.insert(record.key()) {
                return Err(MirrorError::InternalConsistency {
                    context: format!("key '{}' appears more than once", record.key()),
                });
            }
            if let Some(key_index) = &self.key_index {
                let indexed = key_index.get(record.key()).copied();
                if indexed != Some(index) {
                    return Err(MirrorError::InternalConsistency {
                        context: format!(
                            "key index maps '{}' to {:?}, record sits at {}",
                            record.key(),
                            indexed,
                            index
                        ),
                    });
                }
            }
        }
        if let Some(key_index) = &self.key_index {
            if key_index.len() != self.records.len() {
                return Err(MirrorError::InternalConsistency {
                    context: format!(
                        "key index holds {} entries for {} records",
                        key_index.len(),
                        self.records.len()
                    ),
                });
            }
        }
        Ok(())
    }

    fn require_position(&self, key: &str, operation: &'static str) -> Result<usize, MirrorError> {
        self.position(key).ok_or_else(|| MirrorError::KeyNotFound {
            key: key.to_string(),
            operation,
        })
    }

    fn insertion_index(&self, key: &str, prior_key: Option<&str>) -> Result<usize, MirrorError> {
        let Some(prior_key) = non_empty(prior_key) else {
            return Ok(0);
        };
        self.position(prior_key)
            .map(|prior_index| prior_index + 1)
            .ok_or_else(|| MirrorError::PriorKeyNotFound {
                key: key.to_string(),
                prior_key: prior_key.to_string(),
            })
    }

    fn reindex(&mut self, range: Range<usize>) {
        let Some(key_index) = self.key_index.as_mut() else {
            return;
        };
        for index in range {
            let key = self.records[index].key();
            match key_index.get_mut(key) {
                Some(slot) => *slot = index,
                None => {
                    key_index.insert(key.to_string(), index);
                }
            }
        }
    }
}

impl<V> Default for KeyedSequence<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> IntoIterator for &'a KeyedSequence<V> {
    type Item = &'a KeyedRecord<V>;
    type IntoIter = std::slice::Iter<'a, KeyedRecord<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn non_empty(prior_key: Option<&str>) -> Option<&str> {
    prior_key.filter(|prior_key| !prior_key.is_empty())
}
