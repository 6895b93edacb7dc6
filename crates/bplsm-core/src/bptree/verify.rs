use super::{BPTree, Node, NodeId};
use crate::{Error, Result};
use std::fmt;

struct Walk<'a, K> {
    leaves: Vec<NodeId>,
    records: usize,
    nodes: usize,
    last_key: Option<&'a K>,
}

impl<K: Ord, V> BPTree<K, V> {
    /// Walks the whole tree and reports the first structural violation.
    ///
    /// Checks key order and separator bracketing, occupancy bounds, equal leaf
    /// depth, parent back-links, and that the leaf chain visits the leaves in
    /// tree order.
    pub fn check_invariants(&self) -> Result<()> {
        if self.arena.get(self.root).parent().is_some() {
            return Err(Error::corruption(format!("root {:?} has a parent", self.root)));
        }

        let mut walk = Walk {
            leaves: Vec::new(),
            records: 0,
            nodes: 0,
            last_key: None,
        };
        self.check_node(self.root, None, (None, None), 1, &mut walk)?;

        if walk.records != self.len {
            return Err(Error::corruption(format!(
                "tree holds {} records but len is {}",
                walk.records, self.len
            )));
        }
        if walk.nodes != self.arena.live() {
            return Err(Error::corruption(format!(
                "{} nodes reachable but {} allocated",
                walk.nodes,
                self.arena.live()
            )));
        }
        self.check_leaf_chain(&walk.leaves)
    }

    fn check_node<'a>(
        &'a self,
        id: NodeId,
        parent: Option<NodeId>,
        (lower, upper): (Option<&'a K>, Option<&'a K>),
        depth: usize,
        walk: &mut Walk<'a, K>,
    ) -> Result<()> {
        let node = self.arena.get(id);
        walk.nodes += 1;
        if node.parent() != parent {
            return Err(Error::corruption(format!(
                "node {:?} points at parent {:?}, expected {:?}",
                id,
                node.parent(),
                parent
            )));
        }

        let order = self.order.get();
        let floor = self.order.floor();
        let is_root = parent.is_none();

        match node {
            Node::Leaf(leaf) => {
                if depth != self.height {
                    return Err(Error::corruption(format!(
                        "leaf {:?} at depth {} in tree of height {}",
                        id, depth, self.height
                    )));
                }
                let len = leaf.len();
                if len > order || (!is_root && len < floor) {
                    return Err(Error::corruption(format!(
                        "leaf {:?} holds {} records outside [{}, {}]",
                        id, len, floor, order
                    )));
                }
                for record in leaf.records() {
                    let key = record.key();
                    if lower.map_or(false, |lower| key < lower)
                        || upper.map_or(false, |upper| key >= upper)
                    {
                        return Err(Error::corruption(format!(
                            "leaf {:?} holds a key outside its separators",
                            id
                        )));
                    }
                    if walk.last_key.map_or(false, |last| key <= last) {
                        return Err(Error::corruption(format!(
                            "leaf {:?} breaks ascending key order",
                            id
                        )));
                    }
                    walk.last_key = Some(key);
                    walk.records += 1;
                }
                walk.leaves.push(id);
            }
            Node::Interior(interior) => {
                let count = interior.children().len();
                if interior.keys().len() + 1 != count {
                    return Err(Error::corruption(format!(
                        "interior node {:?} has {} keys for {} children",
                        id,
                        interior.keys().len(),
                        count
                    )));
                }
                let min = if is_root { 2 } else { floor };
                if count > order || count < min {
                    return Err(Error::corruption(format!(
                        "interior node {:?} has {} children outside [{}, {}]",
                        id, count, min, order
                    )));
                }
                if interior.keys().windows(2).any(|w| w[0] >= w[1]) {
                    return Err(Error::corruption(format!(
                        "interior node {:?} separators out of order",
                        id
                    )));
                }

                for (i, &child) in interior.children().iter().enumerate() {
                    let child_lower = i.checked_sub(1).map(|s| &interior.keys()[s]).or(lower);
                    let child_upper = interior.keys().get(i).or(upper);
                    self.check_node(child, Some(id), (child_lower, child_upper), depth + 1, walk)?;
                }
            }
        }
        Ok(())
    }

    fn check_leaf_chain(&self, expected: &[NodeId]) -> Result<()> {
        if expected.first() != Some(&self.head) {
            return Err(Error::corruption(format!(
                "head {:?} is not the leftmost leaf",
                self.head
            )));
        }

        let mut prev = None;
        let mut current = Some(self.head);
        for &id in expected {
            if current != Some(id) {
                return Err(Error::corruption(format!(
                    "leaf chain reached {:?}, expected {:?}",
                    current, id
                )));
            }
            let leaf = self.arena.leaf(id);
            if leaf.prev() != prev {
                return Err(Error::corruption(format!(
                    "leaf {:?} links back to {:?}, expected {:?}",
                    id,
                    leaf.prev(),
                    prev
                )));
            }
            prev = Some(id);
            current = leaf.next();
        }

        match current {
            None => Ok(()),
            Some(extra) => Err(Error::corruption(format!(
                "leaf chain continues past the last leaf into {:?}",
                extra
            ))),
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> BPTree<K, V> {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let indent = " ".repeat(depth);
        match self.arena.get(id) {
            Node::Leaf(leaf) => {
                if leaf.is_empty() {
                    return Ok(());
                }
                write!(f, "{}[Leaf-{}]:", indent, depth)?;
                for record in leaf.records() {
                    write!(f, " {}", record)?;
                }
                writeln!(f)
            }
            Node::Interior(interior) => {
                write!(f, "{}[Node-{}]:", indent, depth)?;
                for key in interior.keys() {
                    write!(f, " {}", key)?;
                }
                writeln!(f)?;
                for &child in interior.children() {
                    self.fmt_node(f, child, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for BPTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0)
    }
}
