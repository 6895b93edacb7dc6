//! In-memory B+Tree over [`Record`]s.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Leaves form a
//! doubly-linked chain in key order; the tree keeps the chain's head so an
//! ordered walk never has to descend. Inserts split full nodes upward, deletes
//! borrow from or merge with a sibling and propagate the fix-up toward the root.

mod node;
mod leaf;
mod interior;
mod iter;
mod rebalance;
mod verify;

pub use node::{Node, NodeId};
pub use leaf::LeafNode;
pub use interior::InteriorNode;
pub use iter::{IntoIter, Iter, RangeIter};

use crate::config::Order;
use crate::record::Record;
use crate::Result;
use node::Arena;
use tracing::trace;

pub struct BPTree<K, V> {
    arena: Arena<K, V>,
    root: NodeId,
    head: NodeId,
    order: Order,
    len: usize,
    height: usize,
}

impl<K, V> BPTree<K, V> {
    pub fn with_order(order: Order) -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Node::Leaf(LeafNode::new(None)));
        BPTree {
            arena,
            root,
            head: root,
            order,
            len: 0,
            height: 1,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Number of records, tombstones included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Levels from the root down to the leaves; a lone root leaf is height 1.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        self.arena.get(id)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.head, self.len)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.arena.leaf(self.head).records.first().map(Record::key)
    }

    /// Points `prev` and `next` at each other; either end may be absent.
    fn link(&mut self, prev: Option<NodeId>, next: Option<NodeId>) {
        if let Some(prev) = prev {
            self.arena.leaf_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.arena.leaf_mut(next).prev = prev;
        }
    }

    fn adopt_children(&mut self, parent: NodeId) {
        let children = self.arena.interior(parent).children.clone();
        for child in children {
            self.arena.get_mut(child).set_parent(Some(parent));
        }
    }
}

impl<K: Ord + Clone, V> BPTree<K, V> {
    /// Fails with [`crate::Error::InvalidConfig`] when `order < 3`.
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_order(Order::new(order)?))
    }

    pub fn get(&self, key: &K) -> Option<&Record<K, V>> {
        self.arena.leaf(self.find_leaf(key)).get(key)
    }

    /// Live value for `key`; `None` when absent or tombstoned.
    pub fn get_value(&self, key: &K) -> Option<&V> {
        self.get(key).and_then(Record::value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn insert_or_update(&mut self, key: K, value: V) {
        self.upsert(Record::new(key, value));
    }

    pub fn insert_tombstone(&mut self, key: K) {
        self.upsert(Record::tombstone(key));
    }

    /// Writes `record`, overwriting any record with the same key.
    ///
    /// Only a new key arriving at a full leaf changes the tree's shape.
    pub fn upsert(&mut self, record: Record<K, V>) {
        let leaf_id = self.find_leaf(record.key());
        let leaf = self.arena.leaf_mut(leaf_id);
        if !leaf.upsert(record) {
            return;
        }
        self.len += 1;
        if leaf.len() > self.order.get() {
            self.split_leaf(leaf_id);
        }
    }

    /// Physically deletes `key`, returning its value if it was live.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_record(key).and_then(Record::into_value)
    }

    pub fn remove_record(&mut self, key: &K) -> Option<Record<K, V>> {
        let leaf_id = self.find_leaf(key);
        let leaf = self.arena.leaf_mut(leaf_id);
        let record = leaf.remove(key)?;
        let underflow = leaf.len() < self.order.floor();
        self.len -= 1;

        if underflow && leaf_id != self.root {
            self.rebalance_leaf(leaf_id);
        }
        Some(record)
    }

    pub fn range(&self, start: &K, end: &K) -> RangeIter<'_, K, V> {
        RangeIter::new(&self.arena, self.find_leaf(start), start, end.clone())
    }

    fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match self.arena.get(current) {
                Node::Leaf(_) => return current,
                Node::Interior(interior) => current = interior.child_for(key),
            }
        }
    }

    /// `left_id` holds `order + 1` records; moves the upper part into a new
    /// right sibling.
    fn split_leaf(&mut self, left_id: NodeId) {
        let at = self.order.leaf_split_point();
        let (right_records, parent, next) = {
            let left = self.arena.leaf_mut(left_id);
            (left.split_off(at), left.parent, left.next)
        };
        let separator = right_records[0].key().clone();

        let right_id = self
            .arena
            .alloc(Node::Leaf(LeafNode::with_records(right_records, parent)));
        self.link(Some(left_id), Some(right_id));
        self.link(Some(right_id), next);

        trace!(left = ?left_id, right = ?right_id, "split leaf");
        self.insert_into_parent(left_id, separator, right_id);
    }

    /// Hooks `right` into the tree next to `left`, splitting interior nodes
    /// upward for as long as they overflow.
    fn insert_into_parent(&mut self, mut left: NodeId, mut separator: K, mut right: NodeId) {
        loop {
            let parent = match self.arena.get(left).parent() {
                Some(parent) => parent,
                None => {
                    let root = self.arena.alloc(Node::Interior(InteriorNode::new(
                        vec![separator],
                        vec![left, right],
                        None,
                    )));
                    self.arena.get_mut(left).set_parent(Some(root));
                    self.arena.get_mut(right).set_parent(Some(root));
                    self.root = root;
                    self.height += 1;
                    trace!(root = ?root, height = self.height, "grew new root");
                    return;
                }
            };

            let node = self.arena.interior_mut(parent);
            let idx = match node.position(left) {
                Some(idx) => idx,
                None => panic!("node {:?} missing from parent {:?}", left, parent),
            };
            node.insert_child_after(idx, separator, right);
            let overflow = node.children.len() > self.order.get();
            self.arena.get_mut(right).set_parent(Some(parent));

            if !overflow {
                return;
            }

            let (promoted, right_node) = self.split_interior(parent);
            left = parent;
            separator = promoted;
            right = right_node;
        }
    }

    fn split_interior(&mut self, id: NodeId) -> (K, NodeId) {
        let at = self.order.interior_split_point();
        let node = self.arena.interior_mut(id);
        let grandparent = node.parent;
        let (promoted, keys, children) = match node.split(at) {
            Some(parts) => parts,
            None => panic!("interior node {:?} split with no separator", id),
        };

        let right = self
            .arena
            .alloc(Node::Interior(InteriorNode::new(keys, children, grandparent)));
        self.adopt_children(right);

        trace!(left = ?id, right = ?right, "split interior node");
        (promoted, right)
    }
}

impl<K, V> IntoIterator for BPTree<K, V> {
    type Item = Record<K, V>;
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.arena, self.head)
    }
}

impl<'a, K, V> IntoIterator for &'a BPTree<K, V> {
    type Item = &'a Record<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
