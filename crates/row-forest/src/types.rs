//! Link trait and handle types.
//!
//! Nodes never hold references to each other. Every "pointer" is an
//! `Option<u32>` index into the [`Vec`]-backed arena owned by a
//! [`Forest`](crate::Forest), and the topology helpers in [`crate::util`]
//! work on any arena whose items implement [`Node`].

use std::fmt;

/// Binary tree links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Handle of a row node inside a [`Forest`](crate::Forest).
///
/// Handles stay stable across rotations and removals of other nodes. A
/// handle is invalidated when its node is removed; the slot may later be
/// reused by a new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot of this node.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle of one tree (one level of rows) inside a [`Forest`](crate::Forest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub(crate) u32);

impl TreeId {
    /// Arena slot of this tree.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}
