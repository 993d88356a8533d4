use thiserror::Error;

use crate::path::TreePath;
use crate::types::{NodeId, TreeId};

/// Recoverable failures at the model boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForestError {
    #[error("invalid tree path {0:?}")]
    InvalidPath(String),
    #[error("no row at path {0}")]
    PathNotFound(TreePath),
    #[error("row at path {0} has no parent")]
    NoParent(TreePath),
}

/// A broken structural invariant, reported by [`Forest::validate`](crate::Forest::validate).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("tree {0} is not live")]
    DeadTree(TreeId),
    #[error("root {1} of tree {0} has a parent")]
    RootHasParent(TreeId, NodeId),
    #[error("root {1} of tree {0} is red")]
    RedRoot(TreeId, NodeId),
    #[error("node {0} does not point back at its parent")]
    BrokenParentLink(NodeId),
    #[error("node {0} belongs to another tree than {1}")]
    ForeignNode(NodeId, TreeId),
    #[error("red node {0} has a red child")]
    RedRedEdge(NodeId),
    #[error("black height differs below node {0}")]
    BlackHeightMismatch(NodeId),
    #[error("node {node} stores count {stored}, subtree has {actual}")]
    CountMismatch { node: NodeId, stored: u32, actual: u32 },
    #[error("node {node} stores offset {stored}, subtree spans {actual}")]
    OffsetMismatch { node: NodeId, stored: u64, actual: u64 },
    #[error("node {node} stores total {stored}, subtree has {actual}")]
    TotalMismatch { node: NodeId, stored: u64, actual: u64 },
    #[error("child tree {child} of node {node} does not link back to it")]
    ChildTreeLink { node: NodeId, child: TreeId },
}
