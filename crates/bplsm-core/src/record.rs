use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueEntry<V> {
    Value(V),
    Tombstone,
}

impl<V> ValueEntry<V> {
    pub fn as_value(&self) -> Option<&V> {
        match self {
            ValueEntry::Value(v) => Some(v),
            ValueEntry::Tombstone => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            ValueEntry::Value(v) => Some(v),
            ValueEntry::Tombstone => None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, ValueEntry::Tombstone)
    }
}

/// Unit of storage: a key bound to either a value or a tombstone.
///
/// The key never changes once a record exists; the entry may be overwritten in
/// place by a later write to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record<K, V> {
    key: K,
    entry: ValueEntry<V>,
}

impl<K, V> Record<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Record {
            key,
            entry: ValueEntry::Value(value),
        }
    }

    pub fn tombstone(key: K) -> Self {
        Record {
            key,
            entry: ValueEntry::Tombstone,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn entry(&self) -> &ValueEntry<V> {
        &self.entry
    }

    /// The live value, `None` for a tombstone.
    pub fn value(&self) -> Option<&V> {
        self.entry.as_value()
    }

    pub fn is_tombstone(&self) -> bool {
        self.entry.is_tombstone()
    }

    /// Replaces the entry with `other`'s, keeping this record's key.
    pub fn overwrite(&mut self, other: Record<K, V>) -> ValueEntry<V> {
        std::mem::replace(&mut self.entry, other.entry)
    }

    pub fn into_parts(self) -> (K, ValueEntry<V>) {
        (self.key, self.entry)
    }

    pub fn into_value(self) -> Option<V> {
        self.entry.into_value()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Record<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            ValueEntry::Value(v) => write!(f, "{}={}", self.key, v),
            ValueEntry::Tombstone => write!(f, "{}(delete)", self.key),
        }
    }
}

/// Anything that exposes a record key, owned or borrowed.
///
/// Lets the two-way merge run over owned records (level compaction) and over
/// borrowed ones (read-only scans) alike.
pub trait Keyed {
    type Key: Ord;

    fn key(&self) -> &Self::Key;
}

impl<K: Ord, V> Keyed for Record<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Ord, V> Keyed for &Record<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }
}
