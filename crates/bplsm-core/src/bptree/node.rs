use super::{InteriorNode, LeafNode};
use std::fmt;

/// Index of a node slot in the tree's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub enum Node<K, V> {
    Leaf(LeafNode<K, V>),
    Interior(InteriorNode<K>),
}

impl<K, V> Node<K, V> {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Leaf(leaf) => leaf.parent,
            Node::Interior(interior) => interior.parent,
        }
    }

    pub(super) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Leaf(leaf) => leaf.parent = parent,
            Node::Interior(interior) => interior.parent = parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<K, V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_interior(&self) -> Option<&InteriorNode<K>> {
        match self {
            Node::Interior(interior) => Some(interior),
            _ => None,
        }
    }
}

/// Slot storage for tree nodes.
///
/// Parent, sibling and child relations are `NodeId`s into this arena. Released
/// slots are recycled by later allocations.
pub(super) struct Arena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.free.push(id.0);
                node
            }
            None => panic!("release of dangling node {:?}", id),
        }
    }

    pub fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn get(&self, id: NodeId) -> &Node<K, V> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node reference {:?}", id),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("dangling node reference {:?}", id),
        }
    }

    pub fn leaf(&self, id: NodeId) -> &LeafNode<K, V> {
        match self.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Interior(_) => panic!("node {:?} is not a leaf", id),
        }
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K, V> {
        match self.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Interior(_) => panic!("node {:?} is not a leaf", id),
        }
    }

    pub fn interior(&self, id: NodeId) -> &InteriorNode<K> {
        match self.get(id) {
            Node::Interior(interior) => interior,
            Node::Leaf(_) => panic!("node {:?} is not an interior node", id),
        }
    }

    pub fn interior_mut(&mut self, id: NodeId) -> &mut InteriorNode<K> {
        match self.get_mut(id) {
            Node::Interior(interior) => interior,
            Node::Leaf(_) => panic!("node {:?} is not an interior node", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_recycled() {
        let mut arena: Arena<i32, i32> = Arena::new();
        let a = arena.alloc(Node::Leaf(LeafNode::new(None)));
        let b = arena.alloc(Node::Leaf(LeafNode::new(None)));
        assert_eq!(arena.live(), 2);

        arena.release(a);
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(Node::Interior(InteriorNode::new(Vec::new(), vec![b], None)));
        assert_eq!(c, a);
        assert!(!arena.get(c).is_leaf());
        assert_eq!(arena.interior(c).children(), &[b]);
    }

    #[test]
    #[should_panic(expected = "dangling node reference")]
    fn test_dangling_reference_panics() {
        let mut arena: Arena<i32, i32> = Arena::new();
        let a = arena.alloc(Node::Leaf(LeafNode::new(None)));
        arena.release(a);
        arena.get(a);
    }
}
