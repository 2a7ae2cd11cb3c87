use crate::btree_node::NodeId;
use crate::{BTree, InvariantViolation};

/// Running state of one validation walk.
struct Walk {
    leaf_depth: Option<usize>,
    nodes: usize,
    keys: usize,
}

impl<K: Ord> BTree<K> {
    /// Returns true if every structural invariant holds.
    pub fn validate(&self) -> bool {
        match self.check() {
            Ok(()) => true,
            Err(e) => {
                log::debug!("btree validation failed: {}", e);
                false
            }
        }
    }

    /// Checks every structural invariant, reporting the first one that fails.
    ///
    /// Covers key order, per-node key-count bounds, child counts, uniform leaf
    /// depth, separator ranges and parent links, plus agreement between the
    /// recorded size and the reachable keys and the absence of leaked nodes.
    pub fn check(&self) -> Result<(), InvariantViolation> {
        let mut walk = Walk {
            leaf_depth: None,
            nodes: 0,
            keys: 0,
        };
        if let Some(root) = self.root {
            self.check_node(root, None, 0, None, None, &mut walk)?;
        }

        if walk.keys != self.length {
            return Err(InvariantViolation::SizeMismatch {
                counted: walk.keys,
                recorded: self.length,
            });
        }
        if walk.nodes != self.nodes.live() {
            return Err(InvariantViolation::LeakedNodes {
                live: self.nodes.live(),
                reachable: walk.nodes,
            });
        }
        Ok(())
    }

    fn check_node(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        walk: &mut Walk,
    ) -> Result<(), InvariantViolation> {
        let node = &self.nodes[id];
        let t = self.t;
        let len = node.len();
        walk.nodes += 1;
        walk.keys += len;

        if node.parent != parent {
            return Err(InvariantViolation::ParentLink {
                node: id,
                expected: parent,
                found: node.parent,
            });
        }

        if len > self.max_keys {
            return Err(InvariantViolation::Overfull {
                node: id,
                keys: len,
                max: self.max_keys,
            });
        }
        // Only the root may run below t - 1
        if parent.is_some() && len < t - 1 {
            return Err(InvariantViolation::Underfull {
                node: id,
                keys: len,
                min: t - 1,
            });
        }

        if let Some(position) = node.keys.windows(2).position(|w| w[0] >= w[1]) {
            return Err(InvariantViolation::UnsortedKeys {
                node: id,
                position: position + 1,
            });
        }
        for (position, key) in node.keys.iter().enumerate() {
            let above = lower.map_or(true, |lo| key > lo);
            let below = upper.map_or(true, |hi| key < hi);
            if !above || !below {
                return Err(InvariantViolation::KeyOutOfRange { node: id, position });
            }
        }

        if node.leaf != node.children.is_empty() {
            return Err(InvariantViolation::LeafFlag {
                node: id,
                leaf: node.leaf,
                children: node.children.len(),
            });
        }

        if node.leaf {
            return match walk.leaf_depth {
                None => {
                    walk.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected != depth => Err(InvariantViolation::UnevenLeafDepth {
                    node: id,
                    depth,
                    expected,
                }),
                Some(_) => Ok(()),
            };
        }

        if node.children.len() != len + 1 {
            return Err(InvariantViolation::ChildCount {
                node: id,
                keys: len,
                children: node.children.len(),
            });
        }
        for (i, &child) in node.children.iter().enumerate() {
            let lo = if i > 0 { node.keys.get(i - 1) } else { lower };
            let hi = if i < len { node.keys.get(i) } else { upper };
            self.check_node(child, Some(id), depth + 1, lo, hi, walk)?;
        }
        Ok(())
    }
}
