mod merge;

pub use merge::MergeIterator;

use crate::config::Order;
use crate::level::Level;

/// Builds a fresh level of `capacity` from `newer` and `older`.
///
/// Both inputs are consumed in key order; a key present in both keeps the
/// record from `newer`, tombstones included. The result's occupancy is the
/// number of records written into it.
pub fn merge_levels<K: Ord + Clone, V>(
    newer: Level<K, V>,
    older: Level<K, V>,
    order: Order,
    capacity: usize,
) -> Level<K, V> {
    let mut merged = Level::new(order, capacity);
    for record in MergeIterator::new(newer.into_records(), older.into_records()) {
        merged.insert(record);
    }
    merged
}
