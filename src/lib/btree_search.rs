use std::borrow::Borrow;

use crate::btree_node::NodeId;
use crate::BTree;

impl<K: Ord> BTree<K> {
    /// Returns true if the tree contains the key. Walks the tree recursively.
    pub fn search<Q: ?Sized + Ord>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        match self.root {
            Some(root) => self.search_node(root, key),
            None => false,
        }
    }

    fn search_node<Q: ?Sized + Ord>(&self, id: NodeId, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        let node = &self.nodes[id];
        match node.find_slot(key) {
            Ok(_) => true,
            Err(_) if node.leaf => false,
            Err(idx) => self.search_node(node.children[idx], key),
        }
    }

    /// Returns true if the tree contains the key. Walks the tree with a loop.
    pub fn search_iterative<Q: ?Sized + Ord>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            match node.find_slot(key) {
                Ok(_) => return true,
                Err(_) if node.leaf => return false,
                Err(idx) => current = Some(node.children[idx]),
            }
        }
        false
    }
}

impl<K> BTree<K> {
    /// Returns the smallest key, or `None` if the tree is empty.
    pub fn min(&self) -> Option<&K> {
        let mut current = self.root?;
        while !self.nodes[current].leaf {
            current = self.nodes[current].children[0];
        }
        self.nodes[current].keys.first()
    }

    /// Returns the largest key, or `None` if the tree is empty.
    pub fn max(&self) -> Option<&K> {
        let mut current = self.root?;
        while let Some(&last) = self.nodes[current].children.last() {
            current = last;
        }
        self.nodes[current].keys.last()
    }
}
