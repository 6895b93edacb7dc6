//! Ordered key-value index built from an in-memory B+Tree and a leveled,
//! LSM-style write path on top of it.
//!
//! [`BPTree`] is the ordered store: point lookups, an ordered walk over its
//! leaf chain, and self-rebalancing inserts and deletes. [`LeveledIndex`]
//! buffers writes in a small level-0 tree and merges full levels into
//! progressively larger ones, with newer levels shadowing older ones.

pub mod error;
pub mod config;
pub mod record;

pub mod bptree;
pub mod level;
pub mod compaction;
pub mod index;

pub use error::{Error, Result};
pub use config::{Config, Order};
pub use record::{Keyed, Record, ValueEntry};
pub use bptree::BPTree;
pub use level::{Level, LevelStats};
pub use compaction::MergeIterator;
pub use index::LeveledIndex;
