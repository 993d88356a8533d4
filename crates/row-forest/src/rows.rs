//! Glue between a hierarchical row model and the forest.
//!
//! The model is an external collaborator: it answers how many children a
//! row has and how tall a row renders. [`RowIndex`] turns its change
//! notifications into forest operations and answers the view's
//! positional queries.

use tracing::debug;

use crate::error::ForestError;
use crate::forest::{Forest, OffsetHit};
use crate::node::NodeFlags;
use crate::path::TreePath;
use crate::types::{NodeId, TreeId};

/// What the row index needs to know about the model.
pub trait RowModel {
    /// Children of the row at `path`; the root path asks for the top level.
    fn child_count(&self, path: &TreePath) -> usize;

    /// Rendered height of the row at `path`, in pixels.
    fn row_height(&self, path: &TreePath) -> u32;

    fn has_children(&self, path: &TreePath) -> bool {
        self.child_count(path) > 0
    }
}

/// Row index of one view: a forest whose outermost tree mirrors the top
/// level of a [`RowModel`], with nested trees for expanded rows.
#[derive(Clone, Debug)]
pub struct RowIndex {
    forest: Forest,
    top: TreeId,
}

impl RowIndex {
    /// Builds the top level of `model`, every row collapsed.
    pub fn build<M: RowModel>(model: &M) -> Self {
        Self::build_in(Forest::new(), model)
    }

    /// Like [`RowIndex::build`], using a caller-configured forest.
    pub fn build_in<M: RowModel>(mut forest: Forest, model: &M) -> Self {
        let top = forest.new_tree();
        let mut index = Self { forest, top };
        index.fill(model, top, &TreePath::root(), false);
        debug!(rows = index.visible_rows(), "row index built");
        index
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn top(&self) -> TreeId {
        self.top
    }

    pub fn visible_rows(&self) -> u64 {
        self.forest.total_rows(self.top)
    }

    pub fn total_height(&self) -> u64 {
        self.forest.total_height(self.top)
    }

    /// Locates the node for `path`.
    pub fn lookup(&self, path: &TreePath) -> Result<(TreeId, NodeId), ForestError> {
        self.forest
            .find_path(self.top, path)
            .ok_or_else(|| ForestError::PathNotFound(path.clone()))
    }

    pub fn is_expanded(&self, path: &TreePath) -> Result<bool, ForestError> {
        let (_, node) = self.lookup(path)?;
        Ok(self.forest.children(node).is_some())
    }

    /// Resolves `path` level by level. `Ok(None)` means some ancestor is
    /// collapsed, so the row has no node to update.
    fn resolve(&self, path: &TreePath) -> Result<Option<(TreeId, NodeId)>, ForestError> {
        let missing = || ForestError::PathNotFound(path.clone());
        let (last, head) = path.indices().split_last().ok_or_else(missing)?;
        let mut tree = self.top;
        for idx in head {
            let node = self.forest.find_count(tree, idx + 1).ok_or_else(missing)?;
            match self.forest.children(node) {
                Some(children) => tree = children,
                None => return Ok(None),
            }
        }
        let node = self.forest.find_count(tree, last + 1).ok_or_else(missing)?;
        Ok(Some((tree, node)))
    }

    /// The model inserted a row at `path`.
    pub fn row_inserted<M: RowModel>(&mut self, model: &M, path: &TreePath) -> Result<(), ForestError> {
        let (Some(parent), Some(index)) = (path.parent(), path.last_index()) else {
            return Err(ForestError::NoParent(path.clone()));
        };
        let (pnode, level) = if parent.is_root() {
            (None, Some(self.top))
        } else {
            match self.resolve(&parent)? {
                Some((_, pnode)) => (Some(pnode), self.forest.children(pnode)),
                None => return Ok(()),
            }
        };
        if let Some(tree) = level {
            if index > self.forest.count(tree) {
                return Err(ForestError::PathNotFound(path.clone()));
            }
        }
        if let Some(pnode) = pnode {
            self.forest.set_flags(pnode, NodeFlags::IS_PARENT);
        }
        let Some(tree) = level else {
            // Parent is collapsed; the new row is not visible yet.
            return Ok(());
        };
        let after = match index {
            0 => None,
            i => self.forest.find_count(tree, i),
        };
        let node = self.forest.insert_after(tree, after, model.row_height(path));
        if model.has_children(path) {
            self.forest.set_flags(node, NodeFlags::IS_PARENT);
        }
        debug!(%path, "row inserted");
        Ok(())
    }

    /// The model deleted the row at `path` (and everything below it).
    pub fn row_deleted(&mut self, path: &TreePath) -> Result<(), ForestError> {
        let Some((tree, node)) = self.resolve(path)? else {
            return Ok(());
        };
        self.forest.remove_node(tree, node);
        if self.forest.is_empty(tree) {
            if let Some((_, pnode)) = self.forest.parent_of(tree) {
                self.forest.remove_subtree(tree);
                self.forest.unset_flags(pnode, NodeFlags::IS_PARENT);
            }
        }
        debug!(%path, "row deleted");
        Ok(())
    }

    /// The row at `path` gained its first child or lost its last one.
    pub fn row_has_child_toggled<M: RowModel>(&mut self, model: &M, path: &TreePath) -> Result<(), ForestError> {
        let Some((_, node)) = self.resolve(path)? else {
            return Ok(());
        };
        if model.has_children(path) {
            self.forest.set_flags(node, NodeFlags::IS_PARENT);
        } else {
            self.forest.unset_flags(node, NodeFlags::IS_PARENT);
            if let Some(children) = self.forest.children(node) {
                self.forest.remove_subtree(children);
            }
        }
        Ok(())
    }

    /// The content of the row at `path` changed; its height is re-queried.
    pub fn row_changed<M: RowModel>(&mut self, model: &M, path: &TreePath) -> Result<(), ForestError> {
        let Some((tree, node)) = self.resolve(path)? else {
            return Ok(());
        };
        self.forest.node_set_height(tree, node, model.row_height(path));
        self.forest.unset_flags(node, NodeFlags::INVALID);
        Ok(())
    }

    /// Marks the row at `path` as needing a fresh height measurement; the
    /// next [`RowIndex::row_changed`] for it clears the mark.
    pub fn invalidate(&mut self, path: &TreePath) -> Result<(), ForestError> {
        let (_, node) = self.lookup(path)?;
        self.forest.set_flags(node, NodeFlags::INVALID);
        Ok(())
    }

    /// Expands the row at `path`. With `open_all` every descendant is
    /// expanded too. Returns `false` when the row has no children or was
    /// already expanded (and `open_all` had nothing to add).
    pub fn expand_row<M: RowModel>(
        &mut self,
        model: &M,
        path: &TreePath,
        open_all: bool,
    ) -> Result<bool, ForestError> {
        let (tree, node) = self.lookup(path)?;
        if !self.forest.has_flags(node, NodeFlags::IS_PARENT) {
            return Ok(false);
        }
        if let Some(children) = self.forest.children(node) {
            if !open_all {
                return Ok(false);
            }
            return Ok(self.expand_level(model, children, path));
        }
        let children = self.forest.new_children(tree, node);
        self.fill(model, children, path, open_all);
        debug!(%path, open_all, rows = self.forest.total_rows(children), "row expanded");
        Ok(true)
    }

    /// Collapses the row at `path`, freeing its nested rows. Returns `false`
    /// when it was not expanded.
    pub fn collapse_row(&mut self, path: &TreePath) -> Result<bool, ForestError> {
        let (_, node) = self.lookup(path)?;
        match self.forest.children(node) {
            Some(children) => {
                self.forest.remove_subtree(children);
                debug!(%path, "row collapsed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn expand_all<M: RowModel>(&mut self, model: &M) {
        let top = self.top;
        self.expand_level(model, top, &TreePath::root());
    }

    pub fn collapse_all(&mut self) {
        let mut curr = self.forest.first(self.top);
        while let Some(node) = curr {
            if let Some(children) = self.forest.children(node) {
                self.forest.remove_subtree(children);
            }
            curr = self.forest.next(self.top, node);
        }
    }

    /// Row under pixel `y`, with the offset inside that row.
    pub fn row_at_y(&self, y: u64) -> Option<(TreePath, u32)> {
        let OffsetHit { tree, node, within } = self.forest.find_offset(self.top, y)?;
        Some((self.forest.path_for(tree, node), within))
    }

    /// Top edge of the row at `path`, from the top of the view.
    pub fn row_offset(&self, path: &TreePath) -> Result<u64, ForestError> {
        let (tree, node) = self.lookup(path)?;
        Ok(self.forest.node_absolute_offset(tree, node))
    }

    /// Path of the `n`-th visible row (0-based).
    pub fn nth_visible(&self, n: u64) -> Option<TreePath> {
        let (tree, node) = self.forest.find_index(self.top, n)?;
        Some(self.forest.path_for(tree, node))
    }

    /// Display position of the row at `path` (0-based).
    pub fn visible_index(&self, path: &TreePath) -> Result<u64, ForestError> {
        let (tree, node) = self.lookup(path)?;
        Ok(self.forest.node_get_index(tree, node))
    }

    /// Appends one node per model child of `parent` to the empty `tree`.
    fn fill<M: RowModel>(&mut self, model: &M, tree: TreeId, parent: &TreePath, open_all: bool) {
        let n = model.child_count(parent);
        for i in 0..n {
            let path = parent.child(i as u32);
            let node = self.forest.insert_before(tree, None, model.row_height(&path));
            if model.has_children(&path) {
                self.forest.set_flags(node, NodeFlags::IS_PARENT);
                if open_all {
                    let children = self.forest.new_children(tree, node);
                    self.fill(model, children, &path, true);
                }
            }
        }
    }

    /// Expands every parent row in `tree` and below. Returns `true` when
    /// anything new was materialised.
    fn expand_level<M: RowModel>(&mut self, model: &M, tree: TreeId, parent: &TreePath) -> bool {
        let mut changed = false;
        let mut index = 0u32;
        let mut curr = self.forest.first(tree);
        while let Some(node) = curr {
            let path = parent.child(index);
            if self.forest.has_flags(node, NodeFlags::IS_PARENT) {
                match self.forest.children(node) {
                    Some(children) => changed |= self.expand_level(model, children, &path),
                    None => {
                        let children = self.forest.new_children(tree, node);
                        self.fill(model, children, &path, true);
                        changed = true;
                    }
                }
            }
            index += 1;
            curr = self.forest.next(tree, node);
        }
        changed
    }
}
