//! Augmented red-black tree forest for tree and list view row indexes.
//!
//! Every row of a view is a node in a red-black tree. Each node aggregates
//! the number of rows and the pixel extent of its subtree, so a view can
//! find "the Nth row" and "the row at pixel Y" in O(log n) and get the
//! offset of any row without walking the rows above it. Expanded rows own
//! a nested tree holding their children; the nested tree's extent is
//! folded into the parent row's aggregates, so the same lookups work
//! across arbitrarily deep nesting.
//!
//! All nodes and trees live in one arena owned by a [`Forest`]. Links are
//! `Option<u32>` slot indices; [`NodeId`] and [`TreeId`] are the public
//! handles. Nested trees refer to their parent row by handle only and
//! never own it.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] link trait, [`NodeId`], [`TreeId`] |
//! [`util`] | `first`, `next`, `prev`, `swap` … over any [`Node`] arena |
//! [`node`] | [`RowNode`], [`NodeFlags`] |
//! [`forest`] | [`Forest`]: insertion, removal, rotations, search, traversal |
//! [`check`] | invariant checker |
//! [`path`] | [`TreePath`] |
//! [`selection`] | selection and hover flags |
//! [`rows`] | [`RowModel`] and [`RowIndex`] |
//! [`print`] | debug dump |

pub mod check;
pub mod config;
pub mod error;
pub mod forest;
pub mod node;
pub mod path;
pub mod print;
pub mod rows;
pub mod selection;
pub mod types;
pub mod util;

pub use config::ForestConfig;
pub use error::{ForestError, InvariantError};
pub use forest::{Forest, OffsetHit, TraverseOrder, VisitMut};
pub use node::{NodeFlags, RowNode};
pub use path::TreePath;
pub use rows::{RowIndex, RowModel};
pub use types::{Node, NodeId, TreeId};
