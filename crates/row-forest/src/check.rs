//! Structural invariant checker.

use crate::error::InvariantError;
use crate::forest::Forest;
use crate::types::{NodeId, TreeId};

/// Aggregates recomputed from scratch for one subtree.
struct Recount {
    black_height: usize,
    count: u32,
    offset: u64,
    total: u64,
}

impl Forest {
    /// Checks red-black balance, parent links, ownership and every stored
    /// aggregate of `tree` against values recomputed bottom-up, recursing
    /// into every attached child tree.
    pub fn validate(&self, tree: TreeId) -> Result<(), InvariantError> {
        self.validate_tree(tree).map(|_| ())
    }

    /// Number of black nodes on any root-to-leaf path of `tree`.
    pub fn black_height(&self, tree: TreeId) -> usize {
        let mut bh = 0;
        let mut curr = self.slot(tree).root;
        while let Some(i) = curr {
            let n = &self.nodes[i as usize];
            if n.b {
                bh += 1;
            }
            curr = n.l;
        }
        bh
    }

    fn validate_tree(&self, tree: TreeId) -> Result<Recount, InvariantError> {
        if !self.is_live(tree) {
            return Err(InvariantError::DeadTree(tree));
        }
        let Some(root) = self.trees[tree.0 as usize].root else {
            return Ok(Recount {
                black_height: 0,
                count: 0,
                offset: 0,
                total: 0,
            });
        };
        let rn = &self.nodes[root as usize];
        if rn.p.is_some() {
            return Err(InvariantError::RootHasParent(tree, NodeId(root)));
        }
        if !rn.b {
            return Err(InvariantError::RedRoot(tree, NodeId(root)));
        }
        self.validate_node(tree, root)
    }

    fn validate_node(&self, tree: TreeId, i: u32) -> Result<Recount, InvariantError> {
        let id = NodeId(i);
        let n = &self.nodes[i as usize];
        if n.tree != Some(tree) {
            return Err(InvariantError::ForeignNode(id, tree));
        }

        let mut left = None;
        let mut right = None;
        for (child, out) in [(n.l, &mut left), (n.r, &mut right)] {
            let Some(c) = child else {
                continue;
            };
            let cn = &self.nodes[c as usize];
            if cn.p != Some(i) {
                return Err(InvariantError::BrokenParentLink(NodeId(c)));
            }
            if !n.b && !cn.b {
                return Err(InvariantError::RedRedEdge(id));
            }
            *out = Some(self.validate_node(tree, c)?);
        }
        let empty = || Recount {
            black_height: 0,
            count: 0,
            offset: 0,
            total: 0,
        };
        let left = left.unwrap_or_else(empty);
        let right = right.unwrap_or_else(empty);
        if left.black_height != right.black_height {
            return Err(InvariantError::BlackHeightMismatch(id));
        }

        let nested = match n.children {
            Some(child) => {
                let slot = &self.trees[child.0 as usize];
                if !slot.live || slot.parent_tree != Some(tree) || slot.parent_node != Some(i) {
                    return Err(InvariantError::ChildTreeLink { node: id, child });
                }
                self.validate_tree(child)?
            }
            None => empty(),
        };

        let count = 1 + left.count + right.count;
        let offset = u64::from(n.height) + left.offset + right.offset + nested.offset;
        let total = 1 + left.total + right.total + nested.total;
        if n.count != count {
            return Err(InvariantError::CountMismatch {
                node: id,
                stored: n.count,
                actual: count,
            });
        }
        if n.offset != offset {
            return Err(InvariantError::OffsetMismatch {
                node: id,
                stored: n.offset,
                actual: offset,
            });
        }
        if n.total != total {
            return Err(InvariantError::TotalMismatch {
                node: id,
                stored: n.total,
                actual: total,
            });
        }

        Ok(Recount {
            black_height: left.black_height + usize::from(n.b),
            count,
            offset,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::InvariantError;
    use crate::Forest;

    #[test]
    fn detects_corrupted_aggregates() {
        let mut forest = Forest::new();
        let t = forest.new_tree();
        for h in 0..10 {
            forest.insert_before(t, None, h);
        }
        assert_eq!(forest.validate(t), Ok(()));

        let root = forest.root(t).unwrap();
        forest.nodes[root.0 as usize].offset += 1;
        assert!(matches!(
            forest.validate(t),
            Err(InvariantError::OffsetMismatch { .. })
        ));
    }

    #[test]
    fn detects_red_root() {
        let mut forest = Forest::new();
        let t = forest.new_tree();
        let n = forest.insert_after(t, None, 1);
        forest.nodes[n.0 as usize].b = false;
        assert_eq!(forest.validate(t), Err(InvariantError::RedRoot(t, n)));
    }

    #[test]
    fn detects_stale_child_link() {
        let mut forest = Forest::new();
        let top = forest.new_tree();
        let n = forest.insert_after(top, None, 1);
        let kids = forest.new_children(top, n);
        forest.trees[kids.0 as usize].parent_node = None;
        assert_eq!(
            forest.validate(top),
            Err(InvariantError::ChildTreeLink { node: n, child: kids })
        );
    }
}
