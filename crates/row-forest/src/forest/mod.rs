//! The forest arena.
//!
//! One [`Forest`] owns every node and every tree. A tree is one level of
//! rows; an expanded parent row owns a nested tree through its `children`
//! link, and the nested tree points back at it through the non-owning
//! `parent_tree` / `parent_node` pair.
//!
//! Aggregates are kept exact after every public operation:
//!
//! - `count  = 1 + count(l) + count(r)` (this tree only)
//! - `offset = height + offset(l) + offset(r) + offset(children.root)`
//! - `total  = 1 + total(l) + total(r) + total(children.root)`
//!
//! Mutations inside a nested tree change the extent of its parent row, so
//! every structural operation finishes by pushing the extent delta up
//! through all enclosing trees.

mod insert;
mod remove;
mod rotate;
mod search;
mod walk;

pub use search::OffsetHit;
pub use walk::{TraverseOrder, VisitMut};

use tracing::debug;

use crate::config::ForestConfig;
use crate::node::{NodeFlags, RowNode};
use crate::types::{NodeId, TreeId};
use crate::util;

#[derive(Clone, Debug, Default)]
pub(crate) struct TreeSlot {
    pub(crate) root: Option<u32>,
    pub(crate) parent_tree: Option<TreeId>,
    pub(crate) parent_node: Option<u32>,
    pub(crate) live: bool,
}

/// Arena of row trees linked into a forest.
#[derive(Clone, Debug)]
pub struct Forest {
    pub(crate) nodes: Vec<RowNode>,
    pub(crate) trees: Vec<TreeSlot>,
    free_nodes: Vec<u32>,
    free_trees: Vec<u32>,
    config: ForestConfig,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(config.node_capacity),
            trees: Vec::with_capacity(config.tree_capacity),
            free_nodes: Vec::new(),
            free_trees: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Creates an empty, detached tree.
    pub fn new_tree(&mut self) -> TreeId {
        let slot = TreeSlot {
            live: true,
            ..TreeSlot::default()
        };
        let id = match self.free_trees.pop() {
            Some(i) => {
                self.trees[i as usize] = slot;
                i
            }
            None => {
                self.trees.push(slot);
                (self.trees.len() - 1) as u32
            }
        };
        TreeId(id)
    }

    /// Creates an empty tree nested under `node` (the row is expanded).
    ///
    /// Panics if `node` already has children attached.
    pub fn new_children(&mut self, tree: TreeId, node: NodeId) -> TreeId {
        self.assert_member(tree, node);
        assert!(
            self.nodes[node.0 as usize].children.is_none(),
            "node {node} already has a child tree"
        );
        let child = self.new_tree();
        let slot = &mut self.trees[child.0 as usize];
        slot.parent_tree = Some(tree);
        slot.parent_node = Some(node.0);
        self.nodes[node.0 as usize].children = Some(child);
        debug!(%tree, %node, %child, "child tree created");
        child
    }

    /// Attaches the detached tree `child` under `node`, adding its rows and
    /// extent to every ancestor.
    pub fn attach_children(&mut self, tree: TreeId, node: NodeId, child: TreeId) {
        self.assert_member(tree, node);
        self.assert_live(child);
        assert!(
            self.nodes[node.0 as usize].children.is_none(),
            "node {node} already has a child tree"
        );
        assert!(
            self.trees[child.0 as usize].parent_tree.is_none(),
            "tree {child} is already attached"
        );
        assert!(
            self.outermost(tree) != child,
            "attaching tree {child} under its own descendant"
        );
        let (offset, total) = self.extent(child);
        let slot = &mut self.trees[child.0 as usize];
        slot.parent_tree = Some(tree);
        slot.parent_node = Some(node.0);
        self.nodes[node.0 as usize].children = Some(child);
        self.shift_ancestors(tree, node.0, offset as i64, total as i64);
        debug!(%tree, %node, %child, offset, total, "child tree attached");
        self.self_check(tree);
    }

    /// Sets the pixel height of `node` and propagates the difference to
    /// every enclosing subtree.
    pub fn node_set_height(&mut self, tree: TreeId, node: NodeId, height: u32) {
        self.assert_member(tree, node);
        let old = self.nodes[node.0 as usize].height;
        if old == height {
            return;
        }
        self.nodes[node.0 as usize].height = height;
        let delta = i64::from(height) - i64::from(old);
        let mut curr = Some(node.0);
        while let Some(i) = curr {
            let n = &mut self.nodes[i as usize];
            n.offset = shift(n.offset, delta);
            curr = n.p;
        }
        if let (Some(pt), Some(pn)) = self.parent_link(tree) {
            self.shift_ancestors(pt, pn, delta, 0);
        }
        self.self_check(tree);
    }

    pub fn root(&self, tree: TreeId) -> Option<NodeId> {
        self.slot(tree).root.map(NodeId)
    }

    /// The tree and node this tree is nested under.
    pub fn parent_of(&self, tree: TreeId) -> Option<(TreeId, NodeId)> {
        match self.parent_link(tree) {
            (Some(t), Some(n)) => Some((t, NodeId(n))),
            _ => None,
        }
    }

    /// Child tree of `node`, if the row is expanded.
    pub fn children(&self, node: NodeId) -> Option<TreeId> {
        self.live_node(node).children
    }

    pub fn node(&self, node: NodeId) -> &RowNode {
        self.live_node(node)
    }

    pub fn height(&self, node: NodeId) -> u32 {
        self.live_node(node).height
    }

    /// Tree that owns `node`.
    pub fn tree_of(&self, node: NodeId) -> TreeId {
        self.live_node(node)
            .tree
            .expect("live node always has an owner")
    }

    pub fn contains(&self, tree: TreeId, node: NodeId) -> bool {
        self.nodes
            .get(node.0 as usize)
            .is_some_and(|n| n.tree == Some(tree))
    }

    pub fn is_live(&self, tree: TreeId) -> bool {
        self.trees.get(tree.0 as usize).is_some_and(|t| t.live)
    }

    pub fn is_empty(&self, tree: TreeId) -> bool {
        self.slot(tree).root.is_none()
    }

    /// Nodes of `tree` itself.
    pub fn count(&self, tree: TreeId) -> u32 {
        self.count_of(self.slot(tree).root)
    }

    /// Rows of `tree` including every attached descendant tree.
    pub fn total_rows(&self, tree: TreeId) -> u64 {
        self.extent(tree).1
    }

    /// Pixel extent of `tree` including every attached descendant tree.
    pub fn total_height(&self, tree: TreeId) -> u64 {
        self.extent(tree).0
    }

    /// Number of trees between `tree` and the outermost tree.
    pub fn nesting_level(&self, tree: TreeId) -> usize {
        let mut level = 0;
        let mut t = tree;
        while let Some(pt) = self.slot(t).parent_tree {
            level += 1;
            t = pt;
        }
        level
    }

    /// Top of the nesting chain that contains `tree`.
    pub fn outermost(&self, tree: TreeId) -> TreeId {
        let mut t = tree;
        while let Some(pt) = self.slot(t).parent_tree {
            t = pt;
        }
        t
    }

    /// Number of live nodes across every tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    /// Number of live trees.
    pub fn tree_count(&self) -> usize {
        self.trees.len() - self.free_trees.len()
    }

    pub fn flags(&self, node: NodeId) -> NodeFlags {
        self.live_node(node).flags
    }

    pub fn has_flags(&self, node: NodeId, flags: NodeFlags) -> bool {
        self.live_node(node).flags.contains(flags)
    }

    pub fn set_flags(&mut self, node: NodeId, flags: NodeFlags) {
        self.live_node_mut(node).flags.insert(flags);
    }

    pub fn unset_flags(&mut self, node: NodeId, flags: NodeFlags) {
        self.live_node_mut(node).flags.remove(flags);
    }

    /// Longest root-to-leaf node path in `tree` (balance diagnostic).
    pub fn depth(&self, tree: TreeId) -> usize {
        util::depth(&self.nodes, self.slot(tree).root)
    }

    // --- internals -------------------------------------------------------

    pub(crate) fn slot(&self, tree: TreeId) -> &TreeSlot {
        let slot = &self.trees[tree.0 as usize];
        assert!(slot.live, "tree {tree} has been freed");
        slot
    }

    pub(crate) fn assert_live(&self, tree: TreeId) {
        self.slot(tree);
    }

    pub(crate) fn assert_member(&self, tree: TreeId, node: NodeId) {
        self.assert_live(tree);
        assert!(
            self.contains(tree, node),
            "node {node} does not belong to tree {tree}"
        );
    }

    fn live_node(&self, node: NodeId) -> &RowNode {
        let n = &self.nodes[node.0 as usize];
        assert!(n.tree.is_some(), "node {node} has been removed");
        n
    }

    fn live_node_mut(&mut self, node: NodeId) -> &mut RowNode {
        let n = &mut self.nodes[node.0 as usize];
        assert!(n.tree.is_some(), "node {node} has been removed");
        n
    }

    pub(crate) fn parent_link(&self, tree: TreeId) -> (Option<TreeId>, Option<u32>) {
        let slot = self.slot(tree);
        (slot.parent_tree, slot.parent_node)
    }

    pub(crate) fn set_root(&mut self, tree: TreeId, root: Option<u32>) {
        self.trees[tree.0 as usize].root = root;
    }

    pub(crate) fn alloc_node(&mut self, tree: TreeId, height: u32) -> u32 {
        let node = RowNode::new(tree, height);
        match self.free_nodes.pop() {
            Some(i) => {
                self.nodes[i as usize] = node;
                i
            }
            None => {
                self.nodes.push(node);
                (self.nodes.len() - 1) as u32
            }
        }
    }

    pub(crate) fn release_node(&mut self, i: u32) {
        let n = &mut self.nodes[i as usize];
        n.tree = None;
        n.p = None;
        n.l = None;
        n.r = None;
        n.children = None;
        self.free_nodes.push(i);
    }

    pub(crate) fn release_tree(&mut self, tree: TreeId) {
        self.trees[tree.0 as usize] = TreeSlot::default();
        self.free_trees.push(tree.0);
    }

    #[inline]
    pub(crate) fn is_red(&self, n: Option<u32>) -> bool {
        n.is_some_and(|i| !self.nodes[i as usize].b)
    }

    #[inline]
    pub(crate) fn set_black(&mut self, i: u32, black: bool) {
        self.nodes[i as usize].b = black;
    }

    #[inline]
    pub(crate) fn count_of(&self, n: Option<u32>) -> u32 {
        n.map_or(0, |i| self.nodes[i as usize].count)
    }

    #[inline]
    pub(crate) fn offset_of(&self, n: Option<u32>) -> u64 {
        n.map_or(0, |i| self.nodes[i as usize].offset)
    }

    #[inline]
    pub(crate) fn total_of(&self, n: Option<u32>) -> u64 {
        n.map_or(0, |i| self.nodes[i as usize].total)
    }

    /// `(offset, total)` of the whole tree.
    pub(crate) fn extent(&self, tree: TreeId) -> (u64, u64) {
        let root = self.slot(tree).root;
        (self.offset_of(root), self.total_of(root))
    }

    /// `(offset, total)` contributed by the child tree of node `i`.
    pub(crate) fn child_extent(&self, i: u32) -> (u64, u64) {
        match self.nodes[i as usize].children {
            Some(c) => {
                let root = self.trees[c.0 as usize].root;
                (self.offset_of(root), self.total_of(root))
            }
            None => (0, 0),
        }
    }

    /// Recomputes the aggregates of node `i` from its children.
    pub(crate) fn pull(&mut self, i: u32) {
        let (l, r) = {
            let n = &self.nodes[i as usize];
            (n.l, n.r)
        };
        let (c_offset, c_total) = self.child_extent(i);
        let count = 1 + self.count_of(l) + self.count_of(r);
        let offset = self.offset_of(l) + self.offset_of(r) + c_offset;
        let total = 1 + self.total_of(l) + self.total_of(r) + c_total;
        let n = &mut self.nodes[i as usize];
        n.count = count;
        n.offset = u64::from(n.height) + offset;
        n.total = total;
    }

    /// Recomputes aggregates from `from` up to the root of its tree.
    pub(crate) fn pull_to_root(&mut self, from: Option<u32>) {
        let mut curr = from;
        while let Some(i) = curr {
            self.pull(i);
            curr = self.nodes[i as usize].p;
        }
    }

    /// Adds an extent delta to `node` and all of its ancestors, crossing
    /// into every enclosing tree.
    pub(crate) fn shift_ancestors(&mut self, tree: TreeId, node: u32, d_offset: i64, d_total: i64) {
        if d_offset == 0 && d_total == 0 {
            return;
        }
        let mut tree = tree;
        let mut node = node;
        loop {
            let mut curr = Some(node);
            while let Some(i) = curr {
                let n = &mut self.nodes[i as usize];
                n.offset = shift(n.offset, d_offset);
                n.total = shift(n.total, d_total);
                curr = n.p;
            }
            match self.parent_link(tree) {
                (Some(pt), Some(pn)) => {
                    tree = pt;
                    node = pn;
                }
                _ => return,
            }
        }
    }

    /// Pushes the change of `tree`'s extent since `before` into the
    /// enclosing trees.
    pub(crate) fn propagate(&mut self, tree: TreeId, before: (u64, u64)) {
        let after = self.extent(tree);
        if let (Some(pt), Some(pn)) = self.parent_link(tree) {
            let d_offset = after.0 as i64 - before.0 as i64;
            let d_total = after.1 as i64 - before.1 as i64;
            self.shift_ancestors(pt, pn, d_offset, d_total);
        }
    }

    /// Runs the invariant checker over the whole nesting chain of `tree`
    /// when [`ForestConfig::check_invariants`] is set.
    pub(crate) fn self_check(&self, tree: TreeId) {
        if !self.config.check_invariants || !self.is_live(tree) {
            return;
        }
        let top = self.outermost(tree);
        if let Err(err) = self.validate(top) {
            panic!("forest invariant broken in tree {top}: {err}");
        }
    }
}

#[inline]
pub(crate) fn shift(v: u64, delta: i64) -> u64 {
    v.checked_add_signed(delta)
        .expect("aggregate went negative")
}
