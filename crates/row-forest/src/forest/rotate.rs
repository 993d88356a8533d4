//! Rotations with O(1) aggregate maintenance.
//!
//! A rotation only changes which of the two involved nodes is on top. The
//! promoted node inherits the old top's aggregates unchanged (the set of
//! rows below that position is the same) and the demoted node is
//! recomputed from its new children. The subtrees hanging below are not
//! touched.

use crate::types::TreeId;

use super::Forest;

impl Forest {
    /// Replaces `old` by `new` in the child slot of `parent`, or as the root
    /// of `tree` when `parent` is `None`.
    pub(crate) fn replace_child(&mut self, tree: TreeId, parent: Option<u32>, old: u32, new: Option<u32>) {
        match parent {
            None => self.set_root(tree, new),
            Some(p) => {
                let pn = &mut self.nodes[p as usize];
                if pn.l == Some(old) {
                    pn.l = new;
                } else {
                    pn.r = new;
                }
            }
        }
    }

    /// ```text
    ///     x              y
    ///    / \            / \
    ///   a   y    ->    x   c
    ///      / \        / \
    ///     b   c      a   b
    /// ```
    pub(crate) fn rotate_left(&mut self, tree: TreeId, x: u32) {
        let y = self.nodes[x as usize]
            .r
            .expect("rotate_left needs a right child");
        let b = self.nodes[y as usize].l;
        let p = self.nodes[x as usize].p;

        self.nodes[x as usize].r = b;
        if let Some(b) = b {
            self.nodes[b as usize].p = Some(x);
        }
        self.nodes[y as usize].p = p;
        self.replace_child(tree, p, x, Some(y));
        self.nodes[y as usize].l = Some(x);
        self.nodes[x as usize].p = Some(y);

        self.hand_over(x, y);
    }

    /// ```text
    ///       x          y
    ///      / \        / \
    ///     y   c  ->  a   x
    ///    / \            / \
    ///   a   b          b   c
    /// ```
    pub(crate) fn rotate_right(&mut self, tree: TreeId, x: u32) {
        let y = self.nodes[x as usize]
            .l
            .expect("rotate_right needs a left child");
        let b = self.nodes[y as usize].r;
        let p = self.nodes[x as usize].p;

        self.nodes[x as usize].l = b;
        if let Some(b) = b {
            self.nodes[b as usize].p = Some(x);
        }
        self.nodes[y as usize].p = p;
        self.replace_child(tree, p, x, Some(y));
        self.nodes[y as usize].r = Some(x);
        self.nodes[x as usize].p = Some(y);

        self.hand_over(x, y);
    }

    /// `y` took over the position of `x`.
    fn hand_over(&mut self, x: u32, y: u32) {
        let (count, offset, total) = {
            let n = &self.nodes[x as usize];
            (n.count, n.offset, n.total)
        };
        let n = &mut self.nodes[y as usize];
        n.count = count;
        n.offset = offset;
        n.total = total;
        self.pull(x);
    }
}
