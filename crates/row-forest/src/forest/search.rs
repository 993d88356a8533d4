//! Rank/select by row count and by pixel offset.

use crate::types::{NodeId, TreeId};

use super::Forest;

/// Result of an offset lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetHit {
    /// Tree that holds the row; may be nested below the searched tree.
    pub tree: TreeId,
    pub node: NodeId,
    /// Pixels between the top edge of the row and the searched offset.
    pub within: u32,
}

impl Forest {
    /// The `n`-th row (1-based) of `tree`, ignoring nested child trees.
    pub fn find_count(&self, tree: TreeId, n: u32) -> Option<NodeId> {
        let mut n = n;
        if n == 0 {
            return None;
        }
        let mut curr = self.slot(tree).root;
        while let Some(i) = curr {
            let node = &self.nodes[i as usize];
            let left = self.count_of(node.l);
            if n <= left {
                curr = node.l;
            } else if n == left + 1 {
                return Some(NodeId(i));
            } else {
                n -= left + 1;
                curr = node.r;
            }
        }
        None
    }

    /// 1-based position of `node` within `tree`. Inverse of
    /// [`Forest::find_count`].
    pub fn node_rank(&self, tree: TreeId, node: NodeId) -> u32 {
        self.assert_member(tree, node);
        let mut rank = self.count_of(self.nodes[node.0 as usize].l) + 1;
        let mut curr = node.0;
        while let Some(p) = self.nodes[curr as usize].p {
            let pn = &self.nodes[p as usize];
            if pn.r == Some(curr) {
                rank += self.count_of(pn.l) + 1;
            }
            curr = p;
        }
        rank
    }

    /// Row whose vertical span contains `offset`, measured from the top of
    /// `tree`. Descends into expanded child trees; a row's children are laid
    /// out right below the row itself.
    pub fn find_offset(&self, tree: TreeId, offset: u64) -> Option<OffsetHit> {
        let mut tree = tree;
        let mut y = offset;
        let mut curr = self.slot(tree).root;
        while let Some(i) = curr {
            let node = &self.nodes[i as usize];
            let left = self.offset_of(node.l);
            if y < left {
                curr = node.l;
                continue;
            }
            y -= left;
            let height = u64::from(node.height);
            if y < height {
                return Some(OffsetHit {
                    tree,
                    node: NodeId(i),
                    within: y as u32,
                });
            }
            y -= height;
            let (children, _) = self.child_extent(i);
            if y < children {
                tree = node.children.expect("non-empty child extent implies a child tree");
                curr = self.trees[tree.0 as usize].root;
                continue;
            }
            y -= children;
            curr = node.r;
        }
        None
    }

    /// Pixel offset of the top edge of `node`, measured from the top of
    /// `tree` (the tree that owns the node).
    pub fn node_find_offset(&self, tree: TreeId, node: NodeId) -> u64 {
        self.assert_member(tree, node);
        let mut offset = self.offset_of(self.nodes[node.0 as usize].l);
        let mut curr = node.0;
        while let Some(p) = self.nodes[curr as usize].p {
            let pn = &self.nodes[p as usize];
            if pn.r == Some(curr) {
                offset += pn.offset - pn.r.map_or(0, |r| self.nodes[r as usize].offset);
            }
            curr = p;
        }
        offset
    }

    /// Pixel offset of the top edge of `node` from the top of the outermost
    /// tree enclosing `tree`.
    pub fn node_absolute_offset(&self, tree: TreeId, node: NodeId) -> u64 {
        let mut offset = self.node_find_offset(tree, node);
        let mut t = tree;
        while let Some((pt, pn)) = self.parent_of(t) {
            offset += self.node_find_offset(pt, pn) + u64::from(self.nodes[pn.0 as usize].height);
            t = pt;
        }
        offset
    }

    /// 0-based position of `node` among all visible rows of the outermost
    /// tree enclosing `tree`.
    pub fn node_get_index(&self, tree: TreeId, node: NodeId) -> u64 {
        self.assert_member(tree, node);
        let mut t = tree;
        let mut curr = node.0;
        let mut index = self.total_of(self.nodes[curr as usize].l);
        loop {
            while let Some(p) = self.nodes[curr as usize].p {
                let pn = &self.nodes[p as usize];
                if pn.r == Some(curr) {
                    index += pn.total - self.total_of(pn.r);
                }
                curr = p;
            }
            match self.parent_link(t) {
                (Some(pt), Some(pn)) => {
                    // The parent row itself precedes its children.
                    index += 1 + self.total_of(self.nodes[pn as usize].l);
                    t = pt;
                    curr = pn;
                }
                _ => return index,
            }
        }
    }

    /// Row at 0-based visible position `index`, counting rows of `tree` and
    /// of every expanded child tree in display order. Inverse of
    /// [`Forest::node_get_index`] when `tree` is an outermost tree.
    pub fn find_index(&self, tree: TreeId, index: u64) -> Option<(TreeId, NodeId)> {
        let mut tree = tree;
        let mut k = index;
        let mut curr = self.slot(tree).root;
        while let Some(i) = curr {
            let node = &self.nodes[i as usize];
            let left = self.total_of(node.l);
            if k < left {
                curr = node.l;
                continue;
            }
            k -= left;
            if k == 0 {
                return Some((tree, NodeId(i)));
            }
            k -= 1;
            let (_, children) = self.child_extent(i);
            if k < children {
                tree = node.children.expect("non-empty child count implies a child tree");
                curr = self.trees[tree.0 as usize].root;
                continue;
            }
            k -= children;
            curr = node.r;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ForestConfig;
    use crate::Forest;

    #[test]
    fn offset_lookup_enters_children() {
        let mut forest = Forest::with_config(ForestConfig::checked());
        let top = forest.new_tree();
        let rows: Vec<_> = (0..3).map(|_| forest.insert_before(top, None, 10)).collect();
        let kids = forest.new_children(top, rows[1]);
        let k0 = forest.insert_before(kids, None, 4);
        let k1 = forest.insert_before(kids, None, 6);

        // rows[0]: 0..10, rows[1]: 10..20, k0: 20..24, k1: 24..30, rows[2]: 30..40
        let hit = forest.find_offset(top, 21).unwrap();
        assert_eq!((hit.tree, hit.node, hit.within), (kids, k0, 1));
        let hit = forest.find_offset(top, 29).unwrap();
        assert_eq!((hit.tree, hit.node, hit.within), (kids, k1, 5));
        let hit = forest.find_offset(top, 30).unwrap();
        assert_eq!((hit.tree, hit.node, hit.within), (top, rows[2], 0));
        assert!(forest.find_offset(top, 40).is_none());

        assert_eq!(forest.node_find_offset(top, rows[2]), 30);
        assert_eq!(forest.node_find_offset(kids, k1), 4);
        assert_eq!(forest.node_absolute_offset(kids, k1), 24);
    }

    #[test]
    fn visible_index_round_trip() {
        let mut forest = Forest::with_config(ForestConfig::checked());
        let top = forest.new_tree();
        let rows: Vec<_> = (0..4).map(|_| forest.insert_before(top, None, 1)).collect();
        let kids = forest.new_children(top, rows[2]);
        let k: Vec<_> = (0..3).map(|_| forest.insert_before(kids, None, 1)).collect();
        let deep = forest.new_children(kids, k[0]);
        let d = forest.insert_before(deep, None, 1);

        let order = [
            (top, rows[0]),
            (top, rows[1]),
            (top, rows[2]),
            (kids, k[0]),
            (deep, d),
            (kids, k[1]),
            (kids, k[2]),
            (top, rows[3]),
        ];
        for (i, (t, n)) in order.iter().enumerate() {
            assert_eq!(forest.find_index(top, i as u64), Some((*t, *n)));
            assert_eq!(forest.node_get_index(*t, *n), i as u64);
        }
        assert_eq!(forest.find_index(top, order.len() as u64), None);
        assert_eq!(forest.total_rows(top), 8);
    }

    #[test]
    fn rank_inverts_find_count() {
        let mut forest = Forest::new();
        let t = forest.new_tree();
        for h in 0..37 {
            forest.insert_after(t, None, h);
        }
        assert_eq!(forest.find_count(t, 0), None);
        assert_eq!(forest.find_count(t, 38), None);
        for n in 1..=37 {
            let node = forest.find_count(t, n).unwrap();
            assert_eq!(forest.node_rank(t, node), n);
            // Rows were prepended, so heights run backwards.
            assert_eq!(forest.height(node), 37 - n);
        }
    }
}
