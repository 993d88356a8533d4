//! Node removal, subtree teardown and the red-black delete fixup.

use tracing::{debug, trace};

use crate::types::{NodeId, TreeId};
use crate::util::{first, swap};

use super::Forest;

impl Forest {
    /// Removes `node` from `tree` and frees it.
    ///
    /// A child tree attached to `node` is torn down first, so the row and
    /// everything nested below it disappear together.
    pub fn remove_node(&mut self, tree: TreeId, node: NodeId) {
        self.assert_member(tree, node);
        if let Some(children) = self.nodes[node.0 as usize].children {
            self.remove_subtree(children);
        }
        let before = self.extent(tree);
        let z = node.0;

        let (zl, zr) = {
            let n = &self.nodes[z as usize];
            (n.l, n.r)
        };
        if let (Some(_), Some(r)) = (zl, zr) {
            // Move the successor into z's position so that z has at most one
            // child. Handles keep naming the same rows because only links move.
            let y = first(&self.nodes, Some(r)).expect("right subtree is not empty");
            let root = self.slot(tree).root.expect("tree holding z is not empty");
            let root = swap(&mut self.nodes, root, z, y);
            self.set_root(tree, Some(root));
            let (zb, yb) = (self.nodes[z as usize].b, self.nodes[y as usize].b);
            self.set_black(z, yb);
            self.set_black(y, zb);
            self.pull_to_root(Some(z));
        }

        let (child, parent, z_black) = {
            let n = &self.nodes[z as usize];
            (n.l.or(n.r), n.p, n.b)
        };
        if let Some(c) = child {
            self.nodes[c as usize].p = parent;
        }
        self.replace_child(tree, parent, z, child);
        self.pull_to_root(parent);
        if z_black {
            self.remove_fixup(tree, child, parent);
        }
        self.release_node(z);

        self.propagate(tree, before);
        trace!(%tree, %node, "row removed");
        self.self_check(tree);
    }

    /// Frees `tree`, its nodes and every tree nested below them.
    ///
    /// When `tree` is attached under a parent row the link is cleared and
    /// the removed rows and pixels are subtracted from all ancestors.
    pub fn remove_subtree(&mut self, tree: TreeId) {
        self.assert_live(tree);
        let (offset, total) = self.extent(tree);
        let link = self.parent_link(tree);
        let freed = self.free_tree(tree);
        if let (Some(pt), Some(pn)) = link {
            self.nodes[pn as usize].children = None;
            self.shift_ancestors(pt, pn, -(offset as i64), -(total as i64));
            self.self_check(pt);
        }
        debug!(%tree, freed, offset, "subtree removed");
    }

    /// Releases every node and tree reachable from `tree`. Returns the
    /// number of nodes freed.
    fn free_tree(&mut self, tree: TreeId) -> usize {
        let mut stack: Vec<u32> = self.slot(tree).root.into_iter().collect();
        self.release_tree(tree);
        let mut freed = 0;
        while let Some(i) = stack.pop() {
            let (l, r, children) = {
                let n = &self.nodes[i as usize];
                (n.l, n.r, n.children)
            };
            stack.extend(l);
            stack.extend(r);
            if let Some(c) = children {
                stack.extend(self.trees[c.0 as usize].root);
                self.release_tree(c);
            }
            self.release_node(i);
            freed += 1;
        }
        freed
    }

    /// Restores the red-black properties after a black node was spliced
    /// out. `x` took its place (possibly `None`) below `parent`.
    fn remove_fixup(&mut self, tree: TreeId, mut x: Option<u32>, mut parent: Option<u32>) {
        while !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };
            if self.nodes[p as usize].l == x {
                let mut w = self.nodes[p as usize]
                    .r
                    .expect("double-black node has a sibling");
                if self.is_red(Some(w)) {
                    self.set_black(w, true);
                    self.set_black(p, false);
                    self.rotate_left(tree, p);
                    w = self.nodes[p as usize].r.expect("sibling survives rotation");
                }
                let (wl, wr) = (self.nodes[w as usize].l, self.nodes[w as usize].r);
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.set_black(w, false);
                    x = Some(p);
                    parent = self.nodes[p as usize].p;
                    continue;
                }
                if !self.is_red(wr) {
                    self.set_black(wl.expect("red nephew exists"), true);
                    self.set_black(w, false);
                    self.rotate_right(tree, w);
                    w = self.nodes[p as usize].r.expect("sibling survives rotation");
                }
                let pb = self.nodes[p as usize].b;
                self.set_black(w, pb);
                self.set_black(p, true);
                let wr = self.nodes[w as usize].r.expect("far nephew is red");
                self.set_black(wr, true);
                self.rotate_left(tree, p);
            } else {
                let mut w = self.nodes[p as usize]
                    .l
                    .expect("double-black node has a sibling");
                if self.is_red(Some(w)) {
                    self.set_black(w, true);
                    self.set_black(p, false);
                    self.rotate_right(tree, p);
                    w = self.nodes[p as usize].l.expect("sibling survives rotation");
                }
                let (wl, wr) = (self.nodes[w as usize].l, self.nodes[w as usize].r);
                if !self.is_red(wl) && !self.is_red(wr) {
                    self.set_black(w, false);
                    x = Some(p);
                    parent = self.nodes[p as usize].p;
                    continue;
                }
                if !self.is_red(wl) {
                    self.set_black(wr.expect("red nephew exists"), true);
                    self.set_black(w, false);
                    self.rotate_left(tree, w);
                    w = self.nodes[p as usize].l.expect("sibling survives rotation");
                }
                let pb = self.nodes[p as usize].b;
                self.set_black(w, pb);
                self.set_black(p, true);
                let wl = self.nodes[w as usize].l.expect("far nephew is red");
                self.set_black(wl, true);
                self.rotate_right(tree, p);
            }
            x = self.slot(tree).root;
            parent = None;
        }
        if let Some(x) = x {
            self.set_black(x, true);
        }
    }
}
