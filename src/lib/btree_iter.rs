use crate::btree_node::{Arena, NodeId};
use crate::BTree;

/// An iterator over the keys of a [`BTree`] in ascending order.
pub struct Iter<'a, K> {
    nodes: &'a Arena<K>,
    // Stack of (node, index of the next key to yield)
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(super) fn new(tree: &'a BTree<K>) -> Self {
        let mut iter = Iter {
            nodes: &tree.nodes,
            stack: Vec::new(),
            remaining: tree.length,
        };
        if let Some(root) = tree.root {
            iter.push_leftmost(root);
        }
        iter
    }

    fn push_leftmost(&mut self, mut id: NodeId) {
        loop {
            self.stack.push((id, 0));
            match self.nodes[id].children.first() {
                Some(&child) => id = child,
                None => break,
            }
        }
    }
}

impl<'a, K: 'a> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        while let Some(top) = self.stack.last_mut() {
            let (id, idx) = *top;
            let node = &nodes[id];
            if idx < node.keys.len() {
                // Advance index, then walk the subtree right of this key
                top.1 += 1;
                if !node.leaf {
                    self.push_leftmost(node.children[idx + 1]);
                }
                self.remaining -= 1;
                return Some(&node.keys[idx]);
            }
            self.stack.pop();
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K> BTree<K> {
    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }
}
