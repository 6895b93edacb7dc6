use crate::compaction::{merge_levels, MergeIterator};
use crate::config::{Config, Order};
use crate::level::{Level, LevelStats};
use crate::record::Record;
use crate::{Error, Result};
use std::fmt;
use tracing::debug;

type RecordIter<'a, K, V> = Box<dyn Iterator<Item = &'a Record<K, V>> + 'a>;

/// Multi-level index: writes land in level 0, full levels are merged into the
/// next, larger one.
///
/// Level `i` holds `l0_capacity * growth_factor^i` writes before it is merged
/// down. Lower-numbered levels always hold the more recent writes, so reads
/// stop at the first level that knows the key.
pub struct LeveledIndex<K, V> {
    config: Config,
    order: Order,
    levels: Vec<Level<K, V>>,
}

impl<K, V> LeveledIndex<K, V> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Level<K, V>] {
        &self.levels
    }

    pub fn stats(&self) -> Vec<LevelStats> {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, level)| level.stats(i))
            .collect()
    }
}

impl<K: Ord + Clone, V> LeveledIndex<K, V> {
    pub fn new(l0_capacity: usize, growth_factor: usize, order: usize) -> Result<Self> {
        Self::with_config(Config::new(l0_capacity, growth_factor, order))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let order = Order::new(config.order)?;
        let levels = vec![Level::new(order, config.level_capacity(0))];
        Ok(LeveledIndex {
            config,
            order,
            levels,
        })
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.write(Record::new(key, value));
    }

    /// Writes a tombstone for `key`; older values are shadowed, not deleted.
    pub fn remove(&mut self, key: K) {
        self.write(Record::tombstone(key));
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_record(key)
            .and_then(|(_, record)| record.value())
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Newest record for `key` and the level holding it.
    pub fn get_record(&self, key: &K) -> Option<(usize, &Record<K, V>)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(i, level)| level.get(key).map(|record| (i, record)))
    }

    /// Live `(key, value)` pairs across all levels in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        let mut merged: RecordIter<'_, K, V> = Box::new(std::iter::empty());
        for level in self.levels.iter().rev() {
            merged = Box::new(MergeIterator::new(level.iter(), merged));
        }
        live(merged)
    }

    /// Live pairs with `start <= key < end`.
    pub fn range<'a>(&'a self, start: &K, end: &K) -> impl Iterator<Item = (&'a K, &'a V)> + 'a {
        let mut merged: RecordIter<'a, K, V> = Box::new(std::iter::empty());
        for level in self.levels.iter().rev() {
            merged = Box::new(MergeIterator::new(level.range(start, end), merged));
        }
        live(merged)
    }

    /// Checks every level's tree, the capacity schedule, and that no level is
    /// left at or over capacity.
    pub fn check_invariants(&self) -> Result<()> {
        for (i, level) in self.levels.iter().enumerate() {
            level.tree().check_invariants()?;

            let expected = self.config.level_capacity(i);
            if level.capacity() != expected {
                return Err(Error::corruption(format!(
                    "level {} has capacity {}, expected {}",
                    i,
                    level.capacity(),
                    expected
                )));
            }
            if level.needs_merge() {
                return Err(Error::corruption(format!(
                    "level {} left at occupancy {} of {}",
                    i,
                    level.occupancy(),
                    level.capacity()
                )));
            }
        }
        Ok(())
    }

    fn write(&mut self, record: Record<K, V>) {
        self.levels[0].insert(record);

        let mut level = 0;
        while level < self.levels.len() && self.levels[level].needs_merge() {
            self.merge_down(level);
            level += 1;
        }
    }

    /// Moves the contents of `level` into `level + 1` and leaves `level` empty.
    fn merge_down(&mut self, level: usize) {
        let next = level + 1;
        let capacity = self.config.level_capacity(next);
        let fresh = Level::new(self.order, self.config.level_capacity(level));
        let mut source = std::mem::replace(&mut self.levels[level], fresh);

        if next == self.levels.len() {
            source.set_capacity(capacity);
            debug!(
                level = next,
                occupancy = source.occupancy(),
                capacity,
                "promoted level into new deepest level"
            );
            self.levels.push(source);
        } else if self.levels[next].is_empty() {
            source.set_capacity(capacity);
            debug!(
                level = next,
                occupancy = source.occupancy(),
                capacity,
                "adopted level into empty slot"
            );
            self.levels[next] = source;
        } else {
            let older = std::mem::replace(&mut self.levels[next], Level::new(self.order, capacity));
            let merged = merge_levels(source, older, self.order, capacity);
            debug!(
                level = next,
                occupancy = merged.occupancy(),
                capacity,
                "merged level into next"
            );
            self.levels[next] = merged;
        }
    }
}

fn live<'a, K, V>(records: RecordIter<'a, K, V>) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
where
    K: 'a,
    V: 'a,
{
    records.filter_map(|record| record.value().map(|value| (record.key(), value)))
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for LeveledIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "LeveledIndex: levels={}, growth_factor={}, order={}",
            self.levels.len(),
            self.config.growth_factor,
            self.order
        )?;
        for (i, level) in self.levels.iter().enumerate() {
            writeln!(
                f,
                "Level-{}: capacity={}, occupancy={}",
                i,
                level.capacity(),
                level.occupancy()
            )?;
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}
