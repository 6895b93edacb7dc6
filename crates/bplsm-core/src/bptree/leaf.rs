use super::NodeId;
use crate::record::Record;

pub struct LeafNode<K, V> {
    pub(super) records: Vec<Record<K, V>>,
    pub(super) parent: Option<NodeId>,
    pub(super) prev: Option<NodeId>,
    pub(super) next: Option<NodeId>,
}

impl<K, V> LeafNode<K, V> {
    pub fn new(parent: Option<NodeId>) -> Self {
        Self::with_records(Vec::new(), parent)
    }

    pub(super) fn with_records(records: Vec<Record<K, V>>, parent: Option<NodeId>) -> Self {
        LeafNode {
            records,
            parent,
            prev: None,
            next: None,
        }
    }

    pub fn records(&self) -> &[Record<K, V>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Keeps the first `at` records and returns the rest.
    pub(super) fn split_off(&mut self, at: usize) -> Vec<Record<K, V>> {
        self.records.split_off(at)
    }
}

impl<K: Ord, V> LeafNode<K, V> {
    pub fn search(&self, key: &K) -> Result<usize, usize> {
        self.records.binary_search_by(|r| r.key().cmp(key))
    }

    pub fn get(&self, key: &K) -> Option<&Record<K, V>> {
        self.search(key).ok().map(|idx| &self.records[idx])
    }

    /// Inserts at the sorted position or overwrites in place.
    /// Returns true when the key was not present before.
    pub fn upsert(&mut self, record: Record<K, V>) -> bool {
        match self.search(record.key()) {
            Ok(idx) => {
                self.records[idx].overwrite(record);
                false
            }
            Err(idx) => {
                self.records.insert(idx, record);
                true
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<Record<K, V>> {
        match self.search(key) {
            Ok(idx) => Some(self.records.remove(idx)),
            Err(_) => None,
        }
    }
}
