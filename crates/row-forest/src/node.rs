//! Row node layout.

use bitflags::bitflags;

use crate::types::{Node, TreeId};

bitflags! {
    /// Per-row state bits.
    ///
    /// Only [`NodeFlags::IS_PARENT`] has structural meaning (the model
    /// reports children for this row). The others are view state; flipping
    /// them never changes the shape of a tree or its aggregates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        /// The model row has at least one child.
        const IS_PARENT      = 1 << 0;
        /// Row is part of the selection.
        const SELECTED       = 1 << 1;
        /// Pointer is hovering the row.
        const PRELIT         = 1 << 2;
        /// Expander is animating towards the collapsed state.
        const SEMI_COLLAPSED = 1 << 3;
        /// Expander is animating towards the expanded state.
        const SEMI_EXPANDED  = 1 << 4;
        /// Row sits in the current sort column (display hint).
        const COLUMN_SORTED  = 1 << 5;
        /// Height is a placeholder and needs measuring.
        const INVALID        = 1 << 6;
    }
}

/// One row slot in one tree level.
#[derive(Clone, Debug)]
pub struct RowNode {
    pub(crate) p: Option<u32>,
    pub(crate) l: Option<u32>,
    pub(crate) r: Option<u32>,
    /// `true` = black, `false` = red.
    pub(crate) b: bool,
    pub(crate) height: u32,
    /// Nodes in this subtree, this tree only.
    pub(crate) count: u32,
    /// Pixel extent of this subtree, attached child trees included.
    pub(crate) offset: u64,
    /// Visible rows in this subtree, attached child trees included.
    pub(crate) total: u64,
    pub(crate) children: Option<TreeId>,
    /// Owning tree; `None` while the slot sits on the free list.
    pub(crate) tree: Option<TreeId>,
    pub(crate) flags: NodeFlags,
}

impl RowNode {
    pub(crate) fn new(tree: TreeId, height: u32) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            b: false,
            height,
            count: 1,
            offset: u64::from(height),
            total: 1,
            children: None,
            tree: Some(tree),
            flags: NodeFlags::empty(),
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn children(&self) -> Option<TreeId> {
        self.children
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_black(&self) -> bool {
        self.b
    }
}

impl Node for RowNode {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}
