use crate::bptree::{BPTree, IntoIter, Iter, RangeIter};
use crate::config::Order;
use crate::record::Record;
use std::fmt;

/// One tree of the leveled index together with its write budget.
///
/// `occupancy` counts writes made against this level, updates and tombstones
/// included. It decides when the level is merged down and is not a count of
/// distinct keys.
pub struct Level<K, V> {
    tree: BPTree<K, V>,
    capacity: usize,
    occupancy: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelStats {
    pub level: usize,
    pub capacity: usize,
    pub occupancy: usize,
    pub records: usize,
    pub height: usize,
}

impl<K, V> Level<K, V> {
    pub fn new(order: Order, capacity: usize) -> Self {
        Level {
            tree: BPTree::with_order(order),
            capacity,
            occupancy: 0,
        }
    }

    pub fn tree(&self) -> &BPTree<K, V> {
        &self.tree
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn occupancy(&self) -> usize {
        self.occupancy
    }

    /// True until the first write lands on this level.
    pub fn is_empty(&self) -> bool {
        self.occupancy == 0
    }

    pub fn needs_merge(&self) -> bool {
        self.occupancy >= self.capacity
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn into_records(self) -> IntoIter<K, V> {
        self.tree.into_iter()
    }

    pub fn stats(&self, level: usize) -> LevelStats {
        LevelStats {
            level,
            capacity: self.capacity,
            occupancy: self.occupancy,
            records: self.tree.len(),
            height: self.tree.height(),
        }
    }
}

impl<K: Ord + Clone, V> Level<K, V> {
    pub fn insert(&mut self, record: Record<K, V>) {
        self.occupancy += 1;
        self.tree.upsert(record);
    }

    pub fn get(&self, key: &K) -> Option<&Record<K, V>> {
        self.tree.get(key)
    }

    pub fn range(&self, start: &K, end: &K) -> RangeIter<'_, K, V> {
        self.tree.range(start, end)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Level<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new(3).unwrap()
    }

    #[test]
    fn test_occupancy_counts_every_write() {
        let mut level = Level::new(order(), 4);
        assert!(level.is_empty());

        level.insert(Record::new(1, "a"));
        level.insert(Record::new(1, "b"));
        level.insert(Record::tombstone(2));

        assert_eq!(level.occupancy(), 3);
        assert_eq!(level.tree().len(), 2);
        assert!(!level.needs_merge());

        level.insert(Record::new(3, "c"));
        assert!(level.needs_merge());
    }

    #[test]
    fn test_get_distinguishes_tombstone_from_absent() {
        let mut level = Level::new(order(), 10);
        level.insert(Record::new(1, 10));
        level.insert(Record::tombstone(2));

        assert_eq!(level.get(&1).and_then(Record::value), Some(&10));
        assert!(level.get(&2).map_or(false, Record::is_tombstone));
        assert!(level.get(&3).is_none());
    }

    #[test]
    fn test_stats() {
        let mut level = Level::new(order(), 6);
        for i in 0..5 {
            level.insert(Record::new(i, i));
        }
        level.insert(Record::new(0, 100));

        let stats = level.stats(2);
        assert_eq!(
            stats,
            LevelStats {
                level: 2,
                capacity: 6,
                occupancy: 6,
                records: 5,
                height: 2,
            }
        );
    }
}
