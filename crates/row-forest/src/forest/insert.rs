//! Positional insertion and the red-black insert fixup.

use tracing::trace;

use crate::types::{NodeId, TreeId};
use crate::util::{first, last};

use super::Forest;

impl Forest {
    /// Inserts a row of `height` pixels right after `after` in the in-order
    /// sequence of `tree`, or as the first row when `after` is `None`.
    pub fn insert_after(&mut self, tree: TreeId, after: Option<NodeId>, height: u32) -> NodeId {
        self.assert_live(tree);
        if let Some(a) = after {
            self.assert_member(tree, a);
        }
        let before = self.extent(tree);
        let n = self.alloc_node(tree, height);
        match after {
            None => match first(&self.nodes, self.slot(tree).root) {
                None => self.set_root(tree, Some(n)),
                Some(head) => self.insert_left(n, head),
            },
            Some(a) => match self.nodes[a.0 as usize].r {
                None => self.insert_right(n, a.0),
                Some(r) => {
                    let succ = first(&self.nodes, Some(r)).expect("subtree is not empty");
                    self.insert_left(n, succ);
                }
            },
        }
        self.finish_insert(tree, n, before);
        trace!(%tree, node = n, height, "row inserted after {:?}", after);
        NodeId(n)
    }

    /// Inserts a row of `height` pixels right before `before` in the
    /// in-order sequence of `tree`, or as the last row when `before` is
    /// `None`.
    pub fn insert_before(&mut self, tree: TreeId, before: Option<NodeId>, height: u32) -> NodeId {
        self.assert_live(tree);
        if let Some(b) = before {
            self.assert_member(tree, b);
        }
        let extent = self.extent(tree);
        let n = self.alloc_node(tree, height);
        match before {
            None => match last(&self.nodes, self.slot(tree).root) {
                None => self.set_root(tree, Some(n)),
                Some(tail) => self.insert_right(n, tail),
            },
            Some(b) => match self.nodes[b.0 as usize].l {
                None => self.insert_left(n, b.0),
                Some(l) => {
                    let pred = last(&self.nodes, Some(l)).expect("subtree is not empty");
                    self.insert_right(n, pred);
                }
            },
        }
        self.finish_insert(tree, n, extent);
        trace!(%tree, node = n, height, "row inserted before {:?}", before);
        NodeId(n)
    }

    fn insert_left(&mut self, n: u32, parent: u32) {
        debug_assert!(self.nodes[parent as usize].l.is_none());
        self.nodes[parent as usize].l = Some(n);
        self.nodes[n as usize].p = Some(parent);
    }

    fn insert_right(&mut self, n: u32, parent: u32) {
        debug_assert!(self.nodes[parent as usize].r.is_none());
        self.nodes[parent as usize].r = Some(n);
        self.nodes[n as usize].p = Some(parent);
    }

    fn finish_insert(&mut self, tree: TreeId, n: u32, before: (u64, u64)) {
        let parent = self.nodes[n as usize].p;
        self.pull_to_root(parent);
        self.insert_fixup(tree, n);
        self.propagate(tree, before);
        self.self_check(tree);
    }

    fn insert_fixup(&mut self, tree: TreeId, mut z: u32) {
        while let Some(p) = self.nodes[z as usize].p {
            if self.nodes[p as usize].b {
                break;
            }
            let g = self.nodes[p as usize]
                .p
                .expect("a red node is never the root");
            if self.nodes[g as usize].l == Some(p) {
                let u = self.nodes[g as usize].r;
                if self.is_red(u) {
                    self.recolor(p, g, u);
                    z = g;
                    continue;
                }
                if self.nodes[p as usize].r == Some(z) {
                    z = p;
                    self.rotate_left(tree, z);
                }
                let p = self.nodes[z as usize].p.expect("rotated node has a parent");
                let g = self.nodes[p as usize].p.expect("red parent has a parent");
                self.set_black(p, true);
                self.set_black(g, false);
                self.rotate_right(tree, g);
            } else {
                let u = self.nodes[g as usize].l;
                if self.is_red(u) {
                    self.recolor(p, g, u);
                    z = g;
                    continue;
                }
                if self.nodes[p as usize].l == Some(z) {
                    z = p;
                    self.rotate_right(tree, z);
                }
                let p = self.nodes[z as usize].p.expect("rotated node has a parent");
                let g = self.nodes[p as usize].p.expect("red parent has a parent");
                self.set_black(p, true);
                self.set_black(g, false);
                self.rotate_left(tree, g);
            }
        }
        if let Some(root) = self.slot(tree).root {
            self.set_black(root, true);
        }
    }

    fn recolor(&mut self, p: u32, g: u32, u: Option<u32>) {
        self.set_black(p, true);
        if let Some(u) = u {
            self.set_black(u, true);
        }
        self.set_black(g, false);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ForestConfig;
    use crate::Forest;

    fn heights(forest: &Forest, tree: crate::TreeId) -> Vec<u32> {
        let mut out = Vec::new();
        let mut curr = forest.first(tree);
        while let Some(n) = curr {
            out.push(forest.height(n));
            curr = forest.next(tree, n);
        }
        out
    }

    #[test]
    fn positional_inserts_keep_sequence() {
        let mut forest = Forest::with_config(ForestConfig::checked());
        let t = forest.new_tree();
        let b = forest.insert_after(t, None, 2);
        forest.insert_after(t, None, 1);
        let d = forest.insert_before(t, None, 4);
        forest.insert_before(t, Some(d), 3);
        forest.insert_after(t, Some(d), 5);
        forest.insert_after(t, Some(b), 22);
        assert_eq!(heights(&forest, t), vec![1, 2, 22, 3, 4, 5]);
        assert_eq!(forest.count(t), 6);
        assert_eq!(forest.total_height(t), 37);
    }

    #[test]
    fn ascending_appends_stay_balanced() {
        let mut forest = Forest::with_config(ForestConfig::checked());
        let t = forest.new_tree();
        for h in 0..1000 {
            forest.insert_before(t, None, h);
        }
        assert_eq!(forest.count(t), 1000);
        // A red-black tree of n nodes has depth at most 2 * log2(n + 1).
        assert!(forest.depth(t) <= 20);
        assert!(forest.black_height(t) >= 5);
    }
}
