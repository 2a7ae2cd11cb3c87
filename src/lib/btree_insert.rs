use crate::btree_node::{Node, NodeId};
use crate::BTree;

impl<K: Ord> BTree<K> {
    /// Inserts a key into the tree.
    /// Returns false, leaving the tree untouched, if the key was already present.
    pub fn insert(&mut self, key: K) -> bool {
        if self.search_iterative(&key) {
            return false;
        }

        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.nodes.alloc(Node::new(true, None));
                self.root = Some(root);
                root
            }
        };

        let start = if self.nodes[root].is_full(self.max_keys) {
            // Root split: the only place the tree gets taller
            let mut new_root = Node::new(false, None);
            new_root.children.push(root);
            let new_root = self.nodes.alloc(new_root);
            self.nodes[root].parent = Some(new_root);
            self.root = Some(new_root);
            self.split_child(new_root, 0);
            log::debug!("root split, height now {:?}", self.height());
            new_root
        } else {
            root
        };

        self.insert_non_full(start, key);
        self.length += 1;
        true
    }

    fn insert_non_full(&mut self, mut current: NodeId, key: K) {
        let max_keys = self.max_keys;
        loop {
            let (Ok(mut idx) | Err(mut idx)) = self.nodes[current].find_slot(&key);
            if self.nodes[current].leaf {
                self.nodes[current].keys.insert(idx, key);
                return;
            }

            let child = self.nodes[current].children[idx];
            if self.nodes[child].is_full(max_keys) {
                self.split_child(current, idx);
                // The promoted median now sits at idx; pick the half the key belongs to
                if key > self.nodes[current].keys[idx] {
                    idx += 1;
                }
            }
            current = self.nodes[current].children[idx];
        }
    }

    /// Splits the full child at `parent.children[index]` around its median.
    ///
    /// The median moves up into `parent.keys[index]` and the upper half becomes
    /// a new sibling at `parent.children[index + 1]`.
    fn split_child(&mut self, parent: NodeId, index: usize) {
        let t = self.t;
        let child = self.nodes[parent].children[index];

        let (median, sibling) = {
            let node = &mut self.nodes[child];
            let mut sibling = Node::new(node.leaf, Some(parent));
            sibling.keys.extend(node.keys.drain(t..));
            if !node.leaf {
                sibling.children.extend(node.children.drain(t..));
            }
            (node.keys.remove(t - 1), sibling)
        };

        let sibling = self.nodes.alloc(sibling);
        self.adopt_children(sibling);

        let node = &mut self.nodes[parent];
        node.keys.insert(index, median);
        node.children.insert(index + 1, sibling);
        log::trace!("split node {} into {} under {}", child, sibling, parent);
    }

    /// Points every child of `owner` back at `owner`.
    fn adopt_children(&mut self, owner: NodeId) {
        for i in 0..self.nodes[owner].children.len() {
            let child = self.nodes[owner].children[i];
            self.nodes[child].parent = Some(owner);
        }
    }
}
