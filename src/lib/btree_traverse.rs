use std::collections::VecDeque;

use crate::btree_node::NodeId;
use crate::BTree;

impl<K: Clone> BTree<K> {
    /// Returns every key in ascending order.
    pub fn in_order(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    /// Returns every key, visiting a node's keys before its subtrees.
    pub fn pre_order(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.length);
        if let Some(root) = self.root {
            self.pre_order_node(root, &mut out);
        }
        out
    }

    fn pre_order_node(&self, id: NodeId, out: &mut Vec<K>) {
        let node = &self.nodes[id];
        out.extend_from_slice(&node.keys);
        for &child in &node.children {
            self.pre_order_node(child, out);
        }
    }

    /// Returns every key, visiting nodes breadth first from the root.
    pub fn level_order(&self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.length);
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            let node = &self.nodes[id];
            out.extend_from_slice(&node.keys);
            queue.extend(node.children.iter().copied());
        }
        out
    }

    /// Returns the key lists of every node, grouped by depth.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut result: Vec<Vec<Vec<K>>> = Vec::new();
        if let Some(root) = self.root {
            self.collect_levels(root, 0, &mut result);
        }
        result
    }

    fn collect_levels(&self, id: NodeId, layer: usize, result: &mut Vec<Vec<Vec<K>>>) {
        let node = &self.nodes[id];
        if result.len() > layer {
            result[layer].push(node.keys.clone());
        } else {
            result.push(vec![node.keys.clone()]);
        }
        for &child in &node.children {
            self.collect_levels(child, layer + 1, result);
        }
    }
}
