//! Layout engine for commit graphs with up to three key branches.
//!
//! Raw feed text is parsed into a [`Model`]; the selected key branches are
//! traced into first-parent [`Lineage`]s; the remaining commits are split
//! into [`SubBranch`]es or left in the Other column; [`layout`] assigns
//! columns, offsets and rows; [`classify_edges`] tags every edge for styling.

pub mod classify;
pub mod core;
pub mod decor;
pub mod edges;
pub mod error;
pub mod highlight;
pub mod interaction;
pub mod layout;
pub mod lineage;
pub mod pipeline;

pub use classify::{Classifier, Ownership, SubBranch, SubBranchId};
pub use core::{
    parse_branches, parse_commits, parse_pull_requests, Branch, Commit, Model, ModelStats,
    PullRequest,
};
pub use decor::{Decoration, RefDecorator};
pub use edges::{classify_edges, Edge, EdgeKind, EdgeStyle, HighlightGroup};
pub use error::GraphError;
pub use interaction::{Gesture, InteractionEvent, InteractionState, PointerButton, ViewState};
pub use layout::{layout, Column, Geometry, Layout, Placement, Point};
pub use lineage::{trace_lineage, KeySelection, Lineage, LineageColor, MAX_KEY_BRANCHES};
pub use pipeline::GraphLayout;
