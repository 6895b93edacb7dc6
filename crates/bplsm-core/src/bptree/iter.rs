use super::node::{Arena, Node};
use super::NodeId;
use crate::record::Record;
use std::iter::FusedIterator;

/// Forward walk over the leaf chain, starting at the head leaf.
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    current_leaf: Option<NodeId>,
    current_idx: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(arena: &'a Arena<K, V>, head: NodeId, len: usize) -> Self {
        Iter {
            arena,
            current_leaf: Some(head),
            current_idx: 0,
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Record<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.arena.leaf(self.current_leaf?);
            if let Some(record) = leaf.records.get(self.current_idx) {
                self.current_idx += 1;
                self.remaining -= 1;
                return Some(record);
            }
            self.current_leaf = leaf.next;
            self.current_idx = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Records with `start <= key < end`.
pub struct RangeIter<'a, K, V> {
    arena: &'a Arena<K, V>,
    current_leaf: Option<NodeId>,
    current_idx: usize,
    end: K,
}

impl<'a, K: Ord, V> RangeIter<'a, K, V> {
    pub(super) fn new(arena: &'a Arena<K, V>, start_leaf: NodeId, start: &K, end: K) -> Self {
        let current_idx = match arena.leaf(start_leaf).search(start) {
            Ok(i) => i,
            Err(i) => i,
        };
        RangeIter {
            arena,
            current_leaf: Some(start_leaf),
            current_idx,
            end,
        }
    }
}

impl<'a, K: Ord, V> Iterator for RangeIter<'a, K, V> {
    type Item = &'a Record<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.arena.leaf(self.current_leaf?);
            if let Some(record) = leaf.records.get(self.current_idx) {
                if record.key() >= &self.end {
                    self.current_leaf = None;
                    return None;
                }
                self.current_idx += 1;
                return Some(record);
            }
            self.current_leaf = leaf.next;
            self.current_idx = 0;
        }
    }
}

/// Owning walk over the leaf chain; releases each leaf as it is drained.
pub struct IntoIter<K, V> {
    arena: Arena<K, V>,
    next_leaf: Option<NodeId>,
    current: std::vec::IntoIter<Record<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(arena: Arena<K, V>, head: NodeId) -> Self {
        IntoIter {
            arena,
            next_leaf: Some(head),
            current: Vec::new().into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = Record<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.current.next() {
                return Some(record);
            }
            let id = self.next_leaf?;
            match self.arena.release(id) {
                Node::Leaf(leaf) => {
                    self.next_leaf = leaf.next;
                    self.current = leaf.records.into_iter();
                }
                Node::Interior(_) => panic!("leaf chain reached interior node {:?}", id),
            }
        }
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}
