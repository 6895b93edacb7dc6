use super::{BPTree, Node, NodeId};
use tracing::trace;

impl<K: Ord + Clone, V> BPTree<K, V> {
    /// Restores the record floor of a non-root leaf: borrow from the left
    /// sibling, borrow from the right, merge into the left, merge the right in.
    pub(super) fn rebalance_leaf(&mut self, id: NodeId) {
        let floor = self.order.floor();
        let parent = match self.arena.get(id).parent() {
            Some(parent) => parent,
            None => panic!("non-root leaf {:?} has no parent", id),
        };
        let (idx, left, right) = self.siblings(parent, id);

        if left.map_or(false, |l| self.arena.leaf(l).len() > floor) {
            self.borrow_leaf_from_left(parent, idx);
            return;
        }
        if right.map_or(false, |r| self.arena.leaf(r).len() > floor) {
            self.borrow_leaf_from_right(parent, idx);
            return;
        }

        match (left, right) {
            (Some(_), _) => self.merge_leaves(parent, idx - 1),
            (None, Some(_)) => self.merge_leaves(parent, idx),
            (None, None) => panic!("leaf {:?} has no siblings under {:?}", id, parent),
        }
        self.rebalance_interior(parent);
    }

    /// Walks up from `id` fixing interior underflow; a root left with one
    /// child is replaced by that child.
    pub(super) fn rebalance_interior(&mut self, mut id: NodeId) {
        let floor = self.order.floor();
        loop {
            let (count, parent) = {
                let node = self.arena.interior(id);
                (node.children.len(), node.parent)
            };

            let parent = match parent {
                Some(parent) => parent,
                None => {
                    if count == 1 {
                        self.collapse_root();
                    }
                    return;
                }
            };
            if count >= floor {
                return;
            }

            let (idx, left, right) = self.siblings(parent, id);
            if left.map_or(false, |l| self.arena.interior(l).children.len() > floor) {
                self.borrow_interior_from_left(parent, idx);
                return;
            }
            if right.map_or(false, |r| self.arena.interior(r).children.len() > floor) {
                self.borrow_interior_from_right(parent, idx);
                return;
            }

            match (left, right) {
                (Some(_), _) => self.merge_interiors(parent, idx - 1),
                (None, Some(_)) => self.merge_interiors(parent, idx),
                (None, None) => panic!("interior node {:?} has no siblings under {:?}", id, parent),
            }
            id = parent;
        }
    }

    fn siblings(&self, parent: NodeId, id: NodeId) -> (usize, Option<NodeId>, Option<NodeId>) {
        let node = self.arena.interior(parent);
        let idx = match node.position(id) {
            Some(idx) => idx,
            None => panic!("node {:?} missing from parent {:?}", id, parent),
        };
        let left = idx.checked_sub(1).map(|i| node.children[i]);
        let right = node.children.get(idx + 1).copied();
        (idx, left, right)
    }

    fn borrow_leaf_from_left(&mut self, parent: NodeId, idx: usize) {
        let (left, node) = {
            let p = self.arena.interior(parent);
            (p.children[idx - 1], p.children[idx])
        };
        let record = match self.arena.leaf_mut(left).records.pop() {
            Some(record) => record,
            None => panic!("borrow from empty leaf {:?}", left),
        };
        let separator = record.key().clone();
        self.arena.leaf_mut(node).records.insert(0, record);
        self.arena.interior_mut(parent).keys[idx - 1] = separator;
        trace!(from = ?left, to = ?node, "leaf borrowed from left sibling");
    }

    fn borrow_leaf_from_right(&mut self, parent: NodeId, idx: usize) {
        let (node, right) = {
            let p = self.arena.interior(parent);
            (p.children[idx], p.children[idx + 1])
        };
        let sibling = self.arena.leaf_mut(right);
        let record = sibling.records.remove(0);
        let separator = sibling.records[0].key().clone();
        self.arena.leaf_mut(node).records.push(record);
        self.arena.interior_mut(parent).keys[idx] = separator;
        trace!(from = ?right, to = ?node, "leaf borrowed from right sibling");
    }

    /// Absorbs `children[left_idx + 1]` into `children[left_idx]`.
    fn merge_leaves(&mut self, parent: NodeId, left_idx: usize) {
        let (left, right) = {
            let p = self.arena.interior_mut(parent);
            p.keys.remove(left_idx);
            let right = p.children.remove(left_idx + 1);
            (p.children[left_idx], right)
        };
        let absorbed = match self.arena.release(right) {
            Node::Leaf(leaf) => leaf,
            Node::Interior(_) => panic!("leaf merge with interior node {:?}", right),
        };
        self.arena.leaf_mut(left).records.extend(absorbed.records);
        self.link(Some(left), absorbed.next);
        trace!(into = ?left, absorbed = ?right, "merged leaves");
    }

    fn borrow_interior_from_left(&mut self, parent: NodeId, idx: usize) {
        let (left, node) = {
            let p = self.arena.interior(parent);
            (p.children[idx - 1], p.children[idx])
        };
        let sibling = self.arena.interior_mut(left);
        let (child, key) = match (sibling.children.pop(), sibling.keys.pop()) {
            (Some(child), Some(key)) => (child, key),
            _ => panic!("borrow from underfull interior node {:?}", left),
        };
        let separator = std::mem::replace(&mut self.arena.interior_mut(parent).keys[idx - 1], key);

        let target = self.arena.interior_mut(node);
        target.keys.insert(0, separator);
        target.children.insert(0, child);
        self.arena.get_mut(child).set_parent(Some(node));
        trace!(from = ?left, to = ?node, "interior borrowed from left sibling");
    }

    fn borrow_interior_from_right(&mut self, parent: NodeId, idx: usize) {
        let (node, right) = {
            let p = self.arena.interior(parent);
            (p.children[idx], p.children[idx + 1])
        };
        let sibling = self.arena.interior_mut(right);
        let child = sibling.children.remove(0);
        let key = sibling.keys.remove(0);
        let separator = std::mem::replace(&mut self.arena.interior_mut(parent).keys[idx], key);

        let target = self.arena.interior_mut(node);
        target.keys.push(separator);
        target.children.push(child);
        self.arena.get_mut(child).set_parent(Some(node));
        trace!(from = ?right, to = ?node, "interior borrowed from right sibling");
    }

    /// Pulls the separator down and absorbs `children[left_idx + 1]` into
    /// `children[left_idx]`.
    fn merge_interiors(&mut self, parent: NodeId, left_idx: usize) {
        let (left, right, separator) = {
            let p = self.arena.interior_mut(parent);
            let separator = p.keys.remove(left_idx);
            let right = p.children.remove(left_idx + 1);
            (p.children[left_idx], right, separator)
        };
        let absorbed = match self.arena.release(right) {
            Node::Interior(interior) => interior,
            Node::Leaf(_) => panic!("interior merge with leaf {:?}", right),
        };
        for &child in &absorbed.children {
            self.arena.get_mut(child).set_parent(Some(left));
        }

        let target = self.arena.interior_mut(left);
        target.keys.push(separator);
        target.keys.extend(absorbed.keys);
        target.children.extend(absorbed.children);
        trace!(into = ?left, absorbed = ?right, "merged interior nodes");
    }

    fn collapse_root(&mut self) {
        let old_root = self.root;
        let child = match self.arena.release(old_root) {
            Node::Interior(interior) if interior.children.len() == 1 => interior.children[0],
            _ => panic!("collapse of root {:?} without a single child", old_root),
        };
        self.arena.get_mut(child).set_parent(None);
        self.root = child;
        self.height -= 1;
        trace!(root = ?child, height = self.height, "collapsed root");
    }
}
