//! In-tree and cross-tree traversal.

use crate::node::NodeFlags;
use crate::types::{NodeId, TreeId};
use crate::util;

use super::Forest;

/// Visiting order for [`Forest::traverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraverseOrder {
    PreOrder,
    InOrder,
    PostOrder,
}

/// What a [`Forest::traverse_mut`] visitor may touch.
///
/// Only the flags are writable, so a walk can never change the shape of a
/// tree it is still visiting.
#[derive(Debug)]
pub struct VisitMut<'a> {
    pub tree: TreeId,
    pub node: NodeId,
    pub children: Option<TreeId>,
    pub flags: &'a mut NodeFlags,
}

impl Forest {
    pub fn first(&self, tree: TreeId) -> Option<NodeId> {
        util::first(&self.nodes, self.slot(tree).root).map(NodeId)
    }

    pub fn last(&self, tree: TreeId) -> Option<NodeId> {
        util::last(&self.nodes, self.slot(tree).root).map(NodeId)
    }

    /// In-order successor within `tree`.
    pub fn next(&self, tree: TreeId, node: NodeId) -> Option<NodeId> {
        self.assert_member(tree, node);
        util::next(&self.nodes, node.0).map(NodeId)
    }

    /// In-order predecessor within `tree`.
    pub fn prev(&self, tree: TreeId, node: NodeId) -> Option<NodeId> {
        self.assert_member(tree, node);
        util::prev(&self.nodes, node.0).map(NodeId)
    }

    /// Next row in display order across the whole forest: the first child
    /// of an expanded row, else the next sibling, else the next row after
    /// the nearest ancestor that has one.
    pub fn next_full(&self, tree: TreeId, node: NodeId) -> Option<(TreeId, NodeId)> {
        self.assert_member(tree, node);
        if let Some(child) = self.nodes[node.0 as usize].children {
            if let Some(head) = self.first(child) {
                return Some((child, head));
            }
        }
        let mut tree = tree;
        let mut node = node.0;
        loop {
            if let Some(n) = util::next(&self.nodes, node) {
                return Some((tree, NodeId(n)));
            }
            match self.parent_link(tree) {
                (Some(pt), Some(pn)) => {
                    tree = pt;
                    node = pn;
                }
                _ => return None,
            }
        }
    }

    /// Previous row in display order across the whole forest: the deepest
    /// last descendant of the previous sibling, else the parent row.
    pub fn prev_full(&self, tree: TreeId, node: NodeId) -> Option<(TreeId, NodeId)> {
        self.assert_member(tree, node);
        match util::prev(&self.nodes, node.0) {
            Some(p) => Some(self.deepest_last(tree, NodeId(p))),
            None => self.parent_of(tree),
        }
    }

    /// Last row displayed inside `node`'s expanded descendants, or `node`
    /// itself when it shows no children.
    fn deepest_last(&self, tree: TreeId, node: NodeId) -> (TreeId, NodeId) {
        let mut at = (tree, node);
        while let Some(child) = self.nodes[at.1.0 as usize].children {
            match self.last(child) {
                Some(tail) => at = (child, tail),
                None => break,
            }
        }
        at
    }

    /// Calls `visit` for every node of the subtree rooted at `node`, in the
    /// requested order. Child trees are not entered; visitors that want the
    /// whole forest recurse into [`Forest::children`] themselves.
    pub fn traverse<F>(&self, tree: TreeId, node: NodeId, order: TraverseOrder, mut visit: F)
    where
        F: FnMut(TreeId, NodeId),
    {
        self.assert_member(tree, node);
        self.walk(node.0, order, &mut |i| visit(tree, NodeId(i)));
    }

    /// Like [`Forest::traverse`], but the visitor may rewrite node flags.
    pub fn traverse_mut<F>(&mut self, tree: TreeId, node: NodeId, order: TraverseOrder, mut visit: F)
    where
        F: FnMut(VisitMut<'_>),
    {
        self.assert_member(tree, node);
        let mut ids = Vec::with_capacity(self.nodes[node.0 as usize].count as usize);
        self.walk(node.0, order, &mut |i| ids.push(i));
        for i in ids {
            let n = &mut self.nodes[i as usize];
            visit(VisitMut {
                tree,
                node: NodeId(i),
                children: n.children,
                flags: &mut n.flags,
            });
        }
    }

    fn walk(&self, i: u32, order: TraverseOrder, f: &mut dyn FnMut(u32)) {
        let (l, r) = {
            let n = &self.nodes[i as usize];
            (n.l, n.r)
        };
        if order == TraverseOrder::PreOrder {
            f(i);
        }
        if let Some(l) = l {
            self.walk(l, order, f);
        }
        if order == TraverseOrder::InOrder {
            f(i);
        }
        if let Some(r) = r {
            self.walk(r, order, f);
        }
        if order == TraverseOrder::PostOrder {
            f(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TraverseOrder;
    use crate::Forest;

    #[test]
    fn orders_differ_only_in_placement() {
        let mut forest = Forest::new();
        let t = forest.new_tree();
        let ids: Vec<_> = (0..3).map(|h| forest.insert_before(t, None, h)).collect();
        // Three appends leave ids[1] at the root with ids[0] and ids[2] below.
        let root = forest.root(t).unwrap();
        assert_eq!(root, ids[1]);

        let collect = |order| {
            let mut seen = Vec::new();
            forest.traverse(t, root, order, |_, n| seen.push(n));
            seen
        };
        assert_eq!(collect(TraverseOrder::PreOrder), vec![ids[1], ids[0], ids[2]]);
        assert_eq!(collect(TraverseOrder::InOrder), vec![ids[0], ids[1], ids[2]]);
        assert_eq!(collect(TraverseOrder::PostOrder), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn full_walk_skips_empty_child_trees() {
        let mut forest = Forest::new();
        let top = forest.new_tree();
        let a = forest.insert_before(top, None, 1);
        let b = forest.insert_before(top, None, 1);
        let empty = forest.new_children(top, a);
        assert_eq!(forest.next_full(top, a), Some((top, b)));
        assert_eq!(forest.prev_full(top, b), Some((top, a)));
        assert!(forest.is_empty(empty));
    }
}
