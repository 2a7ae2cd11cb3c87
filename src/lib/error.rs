use thiserror::Error;

/// A structural invariant the tree failed to uphold.
///
/// Produced only by [`BTree::check`](crate::BTree::check). The mutating
/// operations never return one; a violation always means a bug in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Keys inside a node are not strictly ascending.
    #[error("node {node}: keys not strictly ascending at position {position}")]
    UnsortedKeys {
        /// Offending node.
        node: usize,
        /// Position of the first key that is not greater than its predecessor.
        position: usize,
    },
    /// A node holds more than `2t - 1` keys.
    #[error("node {node} holds {keys} keys, maximum is {max}")]
    Overfull {
        /// Offending node.
        node: usize,
        /// Key count found.
        keys: usize,
        /// Upper bound.
        max: usize,
    },
    /// A non-root node holds fewer than `t - 1` keys.
    #[error("node {node} holds {keys} keys, minimum is {min}")]
    Underfull {
        /// Offending node.
        node: usize,
        /// Key count found.
        keys: usize,
        /// Lower bound.
        min: usize,
    },
    /// An internal node with `k` keys does not have `k + 1` children.
    #[error("internal node {node} has {keys} keys but {children} children")]
    ChildCount {
        /// Offending node.
        node: usize,
        /// Key count found.
        keys: usize,
        /// Child count found.
        children: usize,
    },
    /// The leaf flag disagrees with the presence of children.
    #[error("node {node} is flagged leaf={leaf} but has {children} children")]
    LeafFlag {
        /// Offending node.
        node: usize,
        /// Recorded leaf flag.
        leaf: bool,
        /// Child count found.
        children: usize,
    },
    /// Leaves are not all at the same depth.
    #[error("leaf {node} at depth {depth}, expected depth {expected}")]
    UnevenLeafDepth {
        /// Offending leaf.
        node: usize,
        /// Depth found.
        depth: usize,
        /// Depth of the first leaf visited.
        expected: usize,
    },
    /// A key lies outside the range its parent's separators allow.
    #[error("node {node}: key at position {position} is outside its separator range")]
    KeyOutOfRange {
        /// Offending node.
        node: usize,
        /// Position of the key.
        position: usize,
    },
    /// A node's parent link does not name the node that owns it.
    #[error("node {node} records parent {found:?}, expected {expected:?}")]
    ParentLink {
        /// Offending node.
        node: usize,
        /// The owning node (`None` for the root).
        expected: Option<usize>,
        /// The recorded parent.
        found: Option<usize>,
    },
    /// The recorded element count differs from the reachable key count.
    #[error("tree records {recorded} keys but {counted} are reachable")]
    SizeMismatch {
        /// Keys counted by walking the tree.
        counted: usize,
        /// The tree's running count.
        recorded: usize,
    },
    /// Live nodes exist that cannot be reached from the root.
    #[error("{live} live nodes but only {reachable} reachable from the root")]
    LeakedNodes {
        /// Live arena slots.
        live: usize,
        /// Nodes reached from the root.
        reachable: usize,
    },
}
