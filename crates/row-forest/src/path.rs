//! Row paths: sibling indices from the outermost tree down to one row.
//!
//! Paths are derived on demand from a `(tree, node)` pair and never stored
//! on nodes. The textual form joins indices with `:`, e.g. `"2:0:4"` is the
//! fifth child of the first child of the third top-level row.

use std::fmt;
use std::str::FromStr;

use crate::error::ForestError;
use crate::forest::Forest;
use crate::types::{NodeId, TreeId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreePath(Vec<u32>);

impl TreePath {
    /// The empty path, naming the top level itself rather than a row.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: &[u32]) -> Self {
        Self(indices.to_vec())
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the row among its siblings.
    pub fn last_index(&self) -> Option<u32> {
        self.0.last().copied()
    }

    /// Path of the `index`-th child of this row.
    pub fn child(&self, index: u32) -> Self {
        let mut out = self.clone();
        out.0.push(index);
        out
    }

    /// Path of the parent row, or `None` for the root path.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    pub fn push(&mut self, index: u32) {
        self.0.push(index);
    }

    /// Moves to the parent. Returns `false` when already at the root.
    pub fn up(&mut self) -> bool {
        self.0.pop().is_some()
    }

    /// Moves to the next sibling.
    pub fn next(&mut self) {
        if let Some(last) = self.0.last_mut() {
            *last += 1;
        }
    }

    /// Moves to the previous sibling. Returns `false` at the first sibling.
    pub fn prev(&mut self) -> bool {
        match self.0.last_mut() {
            Some(last) if *last > 0 => {
                *last -= 1;
                true
            }
            _ => false,
        }
    }

    /// `true` when `self` lies strictly below `other`.
    pub fn is_descendant(&self, other: &TreePath) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

impl FromStr for TreePath {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ForestError::InvalidPath(s.to_string()));
        }
        s.split(':')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ForestError::InvalidPath(s.to_string()));
                }
                part.parse::<u32>()
                    .map_err(|_| ForestError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Forest {
    /// Path of `node` from the outermost tree enclosing `tree`.
    pub fn path_for(&self, tree: TreeId, node: NodeId) -> TreePath {
        let mut indices = vec![self.node_rank(tree, node) - 1];
        let mut t = tree;
        while let Some((pt, pn)) = self.parent_of(t) {
            indices.push(self.node_rank(pt, pn) - 1);
            t = pt;
        }
        indices.reverse();
        TreePath(indices)
    }

    /// Resolves `path` starting at `tree`. Returns `None` when an index is
    /// out of range or an intermediate row is not expanded.
    pub fn find_path(&self, tree: TreeId, path: &TreePath) -> Option<(TreeId, NodeId)> {
        let (last, head) = path.0.split_last()?;
        let mut t = tree;
        for idx in head {
            let node = self.find_count(t, idx + 1)?;
            t = self.children(node)?;
        }
        self.find_count(t, last + 1).map(|n| (t, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints() {
        let path: TreePath = "2:0:14".parse().unwrap();
        assert_eq!(path.indices(), &[2, 0, 14]);
        assert_eq!(path.to_string(), "2:0:14");
        assert_eq!(TreePath::root().to_string(), "");
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", ":", "1:", "a", "1:-2", "1::2", "+1", "99999999999"] {
            assert_eq!(
                bad.parse::<TreePath>(),
                Err(ForestError::InvalidPath(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn navigation() {
        let mut path = TreePath::from_indices(&[1, 2]);
        assert!(path.prev());
        assert_eq!(path.indices(), &[1, 1]);
        path.next();
        path.push(0);
        assert!(!path.prev());
        assert_eq!(path.parent(), Some(TreePath::from_indices(&[1, 2])));
        assert!(path.is_descendant(&TreePath::from_indices(&[1])));
        assert!(!path.is_descendant(&path.clone()));
        assert!(path.up());
        assert!(path.up());
        assert!(path.up());
        assert!(!path.up());
        assert!(path.is_root());
    }

    #[test]
    fn resolves_nested_rows() {
        let mut forest = Forest::new();
        let top = forest.new_tree();
        let rows: Vec<_> = (0..3).map(|_| forest.insert_before(top, None, 1)).collect();
        let kids = forest.new_children(top, rows[2]);
        let k: Vec<_> = (0..2).map(|_| forest.insert_before(kids, None, 1)).collect();

        assert_eq!(forest.path_for(kids, k[1]).to_string(), "2:1");
        assert_eq!(forest.path_for(top, rows[0]).to_string(), "0");
        assert_eq!(forest.find_path(top, &"2:1".parse().unwrap()), Some((kids, k[1])));
        assert_eq!(forest.find_path(top, &"1:0".parse().unwrap()), None);
        assert_eq!(forest.find_path(top, &"3".parse().unwrap()), None);
        assert_eq!(forest.find_path(top, &TreePath::root()), None);
    }
}
