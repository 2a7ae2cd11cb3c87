use std::borrow::Borrow;
use std::mem;

use crate::btree_node::{Node, NodeId};
use crate::BTree;

impl<K: Ord> BTree<K> {
    /// Removes a key from the tree. Returns true if the key was present.
    pub fn remove<Q: ?Sized + Ord>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.take(key).is_some()
    }

    /// Removes a key from the tree and returns the stored key, if it was present.
    pub fn take<Q: ?Sized + Ord>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
    {
        let root = self.root?;
        let ret = self.remove_from(root, key);
        if ret.is_some() {
            self.length -= 1;
        }

        self.collapse_root();
        ret
    }

    /// Descends from `current`, filling every child before entering it so the
    /// removal at the bottom can never leave a node short of keys.
    fn remove_from<Q: ?Sized + Ord>(&mut self, mut current: NodeId, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
    {
        let t = self.t;
        loop {
            let node = &self.nodes[current];
            match node.find_slot(key) {
                Ok(idx) if node.leaf => {
                    return Some(self.nodes[current].keys.remove(idx));
                }
                Ok(idx) => {
                    let left = node.children[idx];
                    let right = node.children[idx + 1];
                    if self.nodes[left].len() >= t {
                        let pred = self.pop_max(left);
                        return Some(mem::replace(&mut self.nodes[current].keys[idx], pred));
                    }
                    if self.nodes[right].len() >= t {
                        let succ = self.pop_min(right);
                        return Some(mem::replace(&mut self.nodes[current].keys[idx], succ));
                    }
                    // Both neighbours are thin: fold the key down and keep looking there
                    self.merge_children(current, idx);
                    current = left;
                }
                Err(_) if node.leaf => return None,
                Err(idx) => {
                    let idx = self.fill_child(current, idx);
                    current = self.nodes[current].children[idx];
                }
            }
        }
    }

    /// Removes and returns the largest key of the subtree rooted at `current`,
    /// which must already hold at least `t` keys.
    fn pop_max(&mut self, mut current: NodeId) -> K {
        loop {
            let node = &self.nodes[current];
            let last = node.len();
            if node.leaf {
                return self.nodes[current].keys.remove(last - 1);
            }
            let idx = self.fill_child(current, last);
            current = self.nodes[current].children[idx];
        }
    }

    /// Removes and returns the smallest key of the subtree rooted at `current`,
    /// which must already hold at least `t` keys.
    fn pop_min(&mut self, mut current: NodeId) -> K {
        loop {
            if self.nodes[current].leaf {
                return self.nodes[current].keys.remove(0);
            }
            let idx = self.fill_child(current, 0);
            current = self.nodes[current].children[idx];
        }
    }

    /// Makes sure `parent.children[idx]` holds at least `t` keys.
    /// Returns the index of the child that now covers the same key range,
    /// which moves to `idx - 1` when the last child merges into its left sibling.
    fn fill_child(&mut self, parent: NodeId, idx: usize) -> usize {
        let t = self.t;
        let key_count = self.nodes[parent].len();
        let len_of = |tree: &Self, i: usize| tree.nodes[tree.nodes[parent].children[i]].len();

        if len_of(self, idx) >= t {
            return idx;
        }
        if idx > 0 && len_of(self, idx - 1) >= t {
            self.borrow_from_left(parent, idx);
            return idx;
        }
        if idx < key_count && len_of(self, idx + 1) >= t {
            self.borrow_from_right(parent, idx);
            return idx;
        }

        if idx < key_count {
            self.merge_children(parent, idx);
            idx
        } else {
            self.merge_children(parent, idx - 1);
            idx - 1
        }
    }

    /// Rotates the left sibling's last key up through the separator into the
    /// front of `parent.children[idx]`, carrying its last child along.
    fn borrow_from_left(&mut self, parent: NodeId, idx: usize) {
        let child = self.nodes[parent].children[idx];
        let left = self.nodes[parent].children[idx - 1];

        let (moved_key, moved_child) = {
            let sibling = &mut self.nodes[left];
            let last = sibling.len() - 1;
            let key = sibling.keys.remove(last);
            let grandchild = sibling.children.pop();
            (key, grandchild)
        };
        let separator = mem::replace(&mut self.nodes[parent].keys[idx - 1], moved_key);

        let node = &mut self.nodes[child];
        node.keys.insert(0, separator);
        if let Some(grandchild) = moved_child {
            node.children.insert(0, grandchild);
            self.nodes[grandchild].parent = Some(child);
        }
        log::trace!("node {} borrowed from left sibling {}", child, left);
    }

    /// Rotates the right sibling's first key up through the separator onto the
    /// end of `parent.children[idx]`, carrying its first child along.
    fn borrow_from_right(&mut self, parent: NodeId, idx: usize) {
        let child = self.nodes[parent].children[idx];
        let right = self.nodes[parent].children[idx + 1];

        let (moved_key, moved_child) = {
            let sibling = &mut self.nodes[right];
            let key = sibling.keys.remove(0);
            let grandchild = if sibling.leaf {
                None
            } else {
                Some(sibling.children.remove(0))
            };
            (key, grandchild)
        };
        let separator = mem::replace(&mut self.nodes[parent].keys[idx], moved_key);

        let node = &mut self.nodes[child];
        node.keys.push(separator);
        if let Some(grandchild) = moved_child {
            node.children.push(grandchild);
            self.nodes[grandchild].parent = Some(child);
        }
        log::trace!("node {} borrowed from right sibling {}", child, right);
    }

    /// Folds `parent.keys[idx]` and `parent.children[idx + 1]` into
    /// `parent.children[idx]`, releasing the right node.
    fn merge_children(&mut self, parent: NodeId, idx: usize) {
        let (separator, left, right) = {
            let node = &mut self.nodes[parent];
            let separator = node.keys.remove(idx);
            let right = node.children.remove(idx + 1);
            (separator, node.children[idx], right)
        };

        let Node { keys, children, .. } = self.nodes.release(right);
        let node = &mut self.nodes[left];
        node.keys.push(separator);
        node.keys.extend(keys);
        node.children.extend_from_slice(&children);
        for grandchild in children {
            self.nodes[grandchild].parent = Some(left);
        }
        log::trace!("merged node {} into {} under {}", right, left, parent);
    }

    /// Drops an emptied root: an internal root hands over to its only child,
    /// an empty leaf root leaves the tree empty.
    fn collapse_root(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        if !self.nodes[root].keys.is_empty() {
            return;
        }

        let old = self.nodes.release(root);
        if old.leaf {
            self.root = None;
        } else {
            let child = old.children[0];
            self.nodes[child].parent = None;
            self.root = Some(child);
            log::debug!("root collapsed, height now {:?}", self.height());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{check_btree_invariants, init_logging};
    use crate::BTree;
    use std::collections::BTreeSet;

    /// The t=2 tree built from 1..=10:
    /// [4] / [2] [6 8] / [1] [3] [5] [7] [9 10]
    fn ten_keys() -> BTree {
        let mut tree = BTree::new(2);
        tree.extend(1..=10);
        tree
    }

    #[test]
    fn test_remove_nonexistent() {
        let mut tree: BTree<u32> = BTree::new(3);
        assert!(!tree.remove(&42));

        tree.insert(1);
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_single_insert_remove() {
        let mut tree: BTree = BTree::new(3);
        tree.insert(42);
        assert_eq!(tree.take(&42), Some(42));
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.validate());
    }

    /// Ordered by `key` only, so `stamp` shows which stored value came back.
    #[derive(Debug, Clone, Copy)]
    struct Stamped {
        key: u32,
        stamp: u32,
    }

    impl PartialEq for Stamped {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }
    impl Eq for Stamped {}
    impl PartialOrd for Stamped {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Stamped {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.key.cmp(&other.key)
        }
    }
    impl std::borrow::Borrow<u32> for Stamped {
        fn borrow(&self) -> &u32 {
            &self.key
        }
    }

    fn stamped(key: u32) -> Stamped {
        Stamped {
            key,
            stamp: key * 100,
        }
    }

    fn assert_stamps_intact(tree: &BTree<Stamped>) {
        for entry in tree.iter() {
            assert_eq!(entry.stamp, entry.key * 100, "key {} lost its stamp", entry.key);
        }
    }

    #[test]
    fn test_take_returns_stored_key_from_internal_node() {
        let mut tree = BTree::new(2);
        tree.extend((1..=10).map(stamped));
        // [4] / [2] [6 8] / [1] [3] [5] [7] [9 10]

        // Successor path: [2] is thin, [6 8] spares 5 up to the root
        let taken = tree.take(&4u32).map(|e| (e.key, e.stamp));
        assert_eq!(taken, Some((4, 400)));
        assert_eq!(tree.levels()[0][0][0].stamp, 500);
        assert!(tree.validate());
        assert_stamps_intact(&tree);

        // [5] / [2] [8] / [1] [3] [6 7] [9 10]
        // [8] is thin and merges into [2 5 8], which becomes the root;
        // then [6 7] spares 7 to replace 8 (predecessor path)
        let taken = tree.take(&8u32).map(|e| (e.key, e.stamp));
        assert_eq!(taken, Some((8, 800)));
        let levels = tree.levels();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0][0].iter().map(|e| e.key).collect::<Vec<_>>(), vec![2, 5, 7]);
        assert_eq!(levels[0][0][2].stamp, 700);
        assert!(tree.validate());
        assert_stamps_intact(&tree);

        assert_eq!(tree.take(&8u32).map(|e| e.stamp), None);
        assert_eq!(tree.len(), 8);
    }

    #[test]
    fn test_remove_from_internal_uses_successor() {
        init_logging();
        let mut tree = ten_keys();
        // Left child [2] is thin, right child [6 8] can spare a key
        assert!(tree.remove(&4));
        assert_eq!(
            tree.levels(),
            vec![
                vec![vec![5]],
                vec![vec![2], vec![8]],
                vec![vec![1], vec![3], vec![6, 7], vec![9, 10]],
            ]
        );
        check_btree_invariants(&tree, "after removing 4");
    }

    #[test]
    fn test_remove_from_internal_uses_predecessor() {
        let mut tree = ten_keys();
        // Under [6 8], left child [7] is thin and right child [9 10] spares 9
        assert!(tree.remove(&8));
        assert_eq!(
            tree.levels(),
            vec![
                vec![vec![4]],
                vec![vec![2], vec![6, 9]],
                vec![vec![1], vec![3], vec![5], vec![7], vec![10]],
            ]
        );
        check_btree_invariants(&tree, "after removing 8");

        tree.insert(8);
        // Now [7 8] can spare its maximum
        assert!(tree.remove(&9));
        assert_eq!(
            tree.levels(),
            vec![
                vec![vec![4]],
                vec![vec![2], vec![6, 8]],
                vec![vec![1], vec![3], vec![5], vec![7], vec![10]],
            ]
        );
        check_btree_invariants(&tree, "after removing 9");
    }

    #[test]
    fn test_merge_collapses_root() {
        init_logging();
        let mut tree = ten_keys();
        // Descending to 1: [2] borrows 4 through the root, then [1] and [3] merge
        assert!(tree.remove(&1));
        assert_eq!(
            tree.levels(),
            vec![
                vec![vec![6]],
                vec![vec![4], vec![8]],
                vec![vec![2, 3], vec![5], vec![7], vec![9, 10]],
            ]
        );
        check_btree_invariants(&tree, "after removing 1");

        let mut tree: BTree = BTree::new(2);
        tree.extend(1..=4);
        // [2] / [1] [3 4]
        assert!(tree.remove(&3));
        // Both children of the root are thin, so 2 is folded down and the root empties
        assert!(tree.remove(&2));
        assert_eq!(tree.height(), Some(0));
        assert_eq!(tree.levels(), vec![vec![vec![1, 4]]]);
        assert_eq!(tree.node_count(), 1);
        check_btree_invariants(&tree, "after root collapse");
    }

    #[test]
    fn test_borrow_from_left() {
        let mut tree: BTree = BTree::new(2);
        tree.extend([10, 20, 30, 5, 6]);
        // [20] / [5 6 10] [30]
        assert_eq!(tree.levels(), vec![vec![vec![20]], vec![vec![5, 6, 10], vec![30]]]);

        assert!(tree.remove(&30));
        assert_eq!(tree.levels(), vec![vec![vec![10]], vec![vec![5, 6], vec![20]]]);
        check_btree_invariants(&tree, "after borrowing from left");
    }

    #[test]
    fn test_borrow_from_right() {
        let mut tree: BTree = BTree::new(2);
        tree.extend([10, 20, 30, 40]);
        // [20] / [10] [30 40]
        assert!(tree.remove(&10));
        assert_eq!(tree.levels(), vec![vec![vec![30]], vec![vec![20], vec![40]]]);
        check_btree_invariants(&tree, "after borrowing from right");
    }

    #[test]
    fn test_last_child_merges_left() {
        let mut tree: BTree = BTree::new(2);
        tree.extend([10, 20, 30, 40]);
        assert!(tree.remove(&40));
        // [20] / [10] [30]: the last child has no right sibling
        assert!(tree.remove(&30));
        assert_eq!(tree.levels(), vec![vec![vec![10, 20]]]);
        check_btree_invariants(&tree, "after merging last child");
    }

    #[test]
    fn test_sequential_remove() {
        for t in 2..=5 {
            let mut tree = BTree::new(t);
            let mut std_set = BTreeSet::new();
            for i in 0..150u32 {
                tree.insert(i);
                std_set.insert(i);
            }
            for i in 0..150u32 {
                assert_eq!(tree.remove(&i), std_set.remove(&i));
                check_btree_invariants(&tree, &format!("t={} after removing {}", t, i));
                assert!(!tree.search(&i));
            }
            assert!(tree.is_empty());
        }
    }

    #[test]
    fn test_reverse_remove() {
        for t in 2..=5 {
            let mut tree = BTree::new(t);
            tree.extend(0..150u32);
            for i in (0..150u32).rev() {
                assert!(tree.remove(&i));
                check_btree_invariants(&tree, &format!("t={} after removing {}", t, i));
                assert_eq!(tree.len(), i as usize);
            }
            assert_eq!(tree.node_count(), 0);
        }
    }

    #[test]
    fn test_random_remove() {
        let mut tree = BTree::new(3);
        tree.extend(0..100u32);

        // Remove in pseudo-random order
        let remove_order: [u32; 100] = [
            73, 12, 45, 89, 23, 67, 1, 98, 34, 56, 78, 90, 5, 43, 21, 87, 65, 32, 10, 99, 54, 76,
            38, 19, 82, 47, 3, 61, 95, 28, 70, 14, 52, 86, 40, 8, 93, 25, 63, 17, 79, 36, 58, 91,
            4, 48, 81, 22, 69, 33, 96, 11, 55, 88, 27, 64, 2, 46, 83, 20, 72, 39, 94, 7, 51, 85,
            30, 68, 13, 59, 92, 26, 71, 37, 84, 9, 50, 80, 24, 66, 35, 97, 6, 44, 77, 18, 62, 31,
            49, 15, 53, 75, 29, 60, 0, 42, 74, 16, 57, 41,
        ];

        for (removed, &i) in remove_order.iter().enumerate() {
            assert!(tree.remove(&i), "key {} should be present", i);
            assert!(!tree.remove(&i), "key {} removed twice", i);
            check_btree_invariants(&tree, &format!("after removing {}", i));
            assert_eq!(tree.len(), 99 - removed);
        }
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut tree = BTree::new(2);
        tree.extend(0..64u32);
        for i in (0..64u32).step_by(2) {
            tree.remove(&i);
        }
        check_btree_invariants(&tree, "after removing evens");
        for i in (0..64u32).step_by(2) {
            assert!(tree.insert(i));
        }
        check_btree_invariants(&tree, "after reinserting evens");
        assert_eq!(tree.in_order(), (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_alternating_insert_remove() {
        let mut tree = BTree::new(2);
        let mut std_set = BTreeSet::new();
        for i in 0..200u32 {
            tree.insert(i);
            std_set.insert(i);
            if i % 3 == 0 {
                let victim = i / 2;
                assert_eq!(tree.remove(&victim), std_set.remove(&victim));
            }
            check_btree_invariants(&tree, &format!("step {}", i));
        }
        assert_eq!(tree.in_order(), std_set.into_iter().collect::<Vec<_>>());
    }
}
