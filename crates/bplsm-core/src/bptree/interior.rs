use super::NodeId;

/// Separator keys and child links, with `children.len() == keys.len() + 1`.
///
/// Every key under `children[i]` is less than `keys[i]`, which is less than or
/// equal to every key under `children[i + 1]`.
pub struct InteriorNode<K> {
    pub(super) keys: Vec<K>,
    pub(super) children: Vec<NodeId>,
    pub(super) parent: Option<NodeId>,
}

impl<K> InteriorNode<K> {
    pub fn new(keys: Vec<K>, children: Vec<NodeId>, parent: Option<NodeId>) -> Self {
        InteriorNode {
            keys,
            children,
            parent,
        }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Links `child` directly right of `children[idx]`, separated by `key`.
    pub(super) fn insert_child_after(&mut self, idx: usize, key: K, child: NodeId) {
        self.keys.insert(idx, key);
        self.children.insert(idx + 1, child);
    }

    /// Keeps the first `at` children and returns the separator promoted to the
    /// parent together with the right half's keys and children.
    pub(super) fn split(&mut self, at: usize) -> Option<(K, Vec<K>, Vec<NodeId>)> {
        let children = self.children.split_off(at);
        let keys = self.keys.split_off(at);
        let promoted = self.keys.pop()?;
        Some((promoted, keys, children))
    }
}

impl<K: Ord> InteriorNode<K> {
    pub fn child_slot(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    pub fn child_for(&self, key: &K) -> NodeId {
        self.children[self.child_slot(key)]
    }
}
