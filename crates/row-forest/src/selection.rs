//! Selection and hover state kept in node flags.
//!
//! None of these helpers change tree shape or aggregates; they only flip
//! [`NodeFlags`] bits.

use crate::forest::{Forest, TraverseOrder};
use crate::node::NodeFlags;
use crate::types::{NodeId, TreeId};

impl Forest {
    pub fn is_selected(&self, node: NodeId) -> bool {
        self.has_flags(node, NodeFlags::SELECTED)
    }

    /// Selects every row of `tree` and of its expanded descendants.
    /// Returns `true` when at least one row changed.
    pub fn select_all(&mut self, tree: TreeId) -> bool {
        self.set_selected_all(tree, true)
    }

    /// Clears the selection of `tree` and of its expanded descendants.
    /// Returns `true` when at least one row changed.
    pub fn unselect_all(&mut self, tree: TreeId) -> bool {
        self.set_selected_all(tree, false)
    }

    fn set_selected_all(&mut self, tree: TreeId, on: bool) -> bool {
        let Some(root) = self.root(tree) else {
            return false;
        };
        let mut dirty = false;
        let mut nested = Vec::new();
        self.traverse_mut(tree, root, TraverseOrder::PreOrder, |visit| {
            if visit.flags.contains(NodeFlags::SELECTED) != on {
                visit.flags.set(NodeFlags::SELECTED, on);
                dirty = true;
            }
            nested.extend(visit.children);
        });
        for child in nested {
            dirty |= self.set_selected_all(child, on);
        }
        dirty
    }

    /// Number of selected rows in `tree` and its expanded descendants.
    pub fn count_selected(&self, tree: TreeId) -> u64 {
        let Some(root) = self.root(tree) else {
            return 0;
        };
        let mut selected = 0;
        self.traverse(tree, root, TraverseOrder::PreOrder, |_, node| {
            if self.is_selected(node) {
                selected += 1;
            }
            if let Some(child) = self.children(node) {
                selected += self.count_selected(child);
            }
        });
        selected
    }

    /// Selected rows of `tree` and its expanded descendants, in display
    /// order.
    pub fn selected_rows(&self, tree: TreeId) -> Vec<(TreeId, NodeId)> {
        let level = self.nesting_level(tree);
        let mut out = Vec::new();
        let mut curr = self.first(tree).map(|n| (tree, n));
        while let Some((t, n)) = curr {
            // Climbing above `tree` ends its region.
            if self.nesting_level(t) < level {
                break;
            }
            if self.is_selected(n) {
                out.push((t, n));
            }
            curr = self.next_full(t, n);
        }
        out
    }

    /// Selects `from..=to` in display order (both rows inclusive, either
    /// order), leaving rows outside the range untouched.
    pub fn select_range(&mut self, from: (TreeId, NodeId), to: (TreeId, NodeId)) {
        let top = self.outermost(from.0);
        let a = self.node_get_index(from.0, from.1);
        let b = self.node_get_index(to.0, to.1);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut curr = self.find_index(top, lo);
        for _ in lo..=hi {
            let Some((t, n)) = curr else {
                break;
            };
            self.set_flags(n, NodeFlags::SELECTED);
            curr = self.next_full(t, n);
        }
    }

    /// Moves the hover highlight to `node`, clearing it from `previous`.
    pub fn set_prelight(&mut self, previous: Option<NodeId>, node: Option<NodeId>) {
        if let Some(p) = previous {
            self.unset_flags(p, NodeFlags::PRELIT);
        }
        if let Some(n) = node {
            self.set_flags(n, NodeFlags::PRELIT);
        }
    }
}
