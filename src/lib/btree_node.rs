use std::borrow::Borrow;
use std::ops::{Index, IndexMut};

/// Stable address of a node inside an [`Arena`].
pub(super) type NodeId = usize;

pub(super) struct Node<K> {
    pub(super) keys: Vec<K>,
    pub(super) children: Vec<NodeId>,
    pub(super) leaf: bool,
    pub(super) parent: Option<NodeId>,
}

impl<K> Node<K> {
    // Storage grows on demand; t may be far larger than any node ever gets
    pub(super) fn new(leaf: bool, parent: Option<NodeId>) -> Self {
        Node {
            keys: Vec::new(),
            children: Vec::new(),
            leaf,
            parent,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(super) fn is_full(&self, max_keys: usize) -> bool {
        self.keys.len() >= max_keys
    }

    /// Finds the key. Returns Ok(index) if found, Err(index) if not.
    /// The index in Err is the child slot to descend into.
    pub(super) fn find_slot<Q: ?Sized + Ord>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
    {
        self.keys.binary_search_by(|k| k.borrow().cmp(key))
    }
}

/// Slot storage for nodes. Released slots are handed out again by `alloc`.
pub(super) struct Arena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
    live: usize,
}

impl<K> Arena<K> {
    pub(super) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub(super) fn alloc(&mut self, node: Node<K>) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Releases the slot and hands back the node it held.
    pub(super) fn release(&mut self, id: NodeId) -> Node<K> {
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.live -= 1;
                self.free.push(id);
                node
            }
            None => panic!("btree node {id} released twice"),
        }
    }

    pub(super) fn live(&self) -> usize {
        self.live
    }

    pub(super) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<K> Index<NodeId> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("btree node {id} is not live"),
        }
    }
}

impl<K> IndexMut<NodeId> for Arena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("btree node {id} is not live"),
        }
    }
}
