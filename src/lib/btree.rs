//! A B-Tree of ordered keys, parameterized by its minimum degree.
//!
//! Every non-root node holds between `t - 1` and `2t - 1` keys. Insertion
//! splits full nodes on the way down and deletion fills thin nodes on the way
//! down, so neither operation ever walks back up the tree.
#![warn(missing_docs)]

use std::fmt;

mod btree_insert;
mod btree_iter;
mod btree_node;
mod btree_remove;
mod btree_search;
mod btree_traverse;
mod btree_validate;
mod error;

pub use btree_iter::Iter;
pub use error::InvariantViolation;

use btree_node::{Arena, NodeId};

/// Smallest legal minimum degree. Smaller values passed to [`BTree::new`] are raised to it.
pub const MIN_DEGREE: usize = 2;

/// A B-Tree set of keys with minimum degree `t`.
pub struct BTree<K = i64> {
    nodes: Arena<K>,
    root: Option<NodeId>,
    t: usize,
    // 2t - 1, saturated so huge degrees cannot overflow
    max_keys: usize,
    length: usize,
}

impl<K> BTree<K> {
    /// Creates an empty tree with minimum degree `t`, clamped to at least [`MIN_DEGREE`].
    pub fn new(t: usize) -> Self {
        if t < MIN_DEGREE {
            log::debug!("minimum degree {} raised to {}", t, MIN_DEGREE);
        }
        let t = t.max(MIN_DEGREE);
        BTree {
            nodes: Arena::new(),
            root: None,
            t,
            max_keys: t.saturating_mul(2) - 1,
            length: 0,
        }
    }

    /// Returns the minimum degree the tree was built with.
    pub fn min_degree(&self) -> usize {
        self.t
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the number of edges from the root to any leaf, or `None` for an empty tree.
    pub fn height(&self) -> Option<usize> {
        let mut current = self.root?;
        let mut height = 0;
        while !self.nodes[current].leaf {
            current = self.nodes[current].children[0];
            height += 1;
        }
        Some(height)
    }

    /// Returns the number of nodes currently allocated.
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// Removes every key and releases all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.length = 0;
    }
}

impl<K> Default for BTree<K> {
    fn default() -> Self {
        Self::new(MIN_DEGREE)
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: fmt::Display> fmt::Display for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return write!(f, "(empty)");
        };
        let mut layer = vec![root];
        let mut depth = 0;
        while !layer.is_empty() {
            if depth > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:", depth)?;
            let mut next = Vec::new();
            for &id in &layer {
                let node = &self.nodes[id];
                write!(f, " [")?;
                for (i, key) in node.keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", key)?;
                }
                write!(f, "]")?;
                next.extend_from_slice(&node.children);
            }
            layer = next;
            depth += 1;
        }
        Ok(())
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("t", &self.t)
            .field("len", &self.length)
            .field("keys", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
