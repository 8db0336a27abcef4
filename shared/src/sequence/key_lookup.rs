/// How a [`KeyedSequence`](crate::KeyedSequence) resolves a key to its index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyLookup {
    /// Scan the records front to back on every lookup. O(n), no extra memory.
    LinearScan,
    /// Keep a key -> index map updated by every structural mutation. O(1)
    /// lookups, structural mutations still pay O(n) to shift indices.
    #[default]
    KeyIndex,
}
