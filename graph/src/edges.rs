use crate::classify::SubBranchId;
use crate::core::Model;
use crate::layout::Layout;
use crate::lineage::LineageColor;
use serde::Serialize;

/// Semantic category of a child -> parent edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Both ends on the same lineage column
    Mainline,
    /// Both ends are lineage commits in different columns
    CrossLineage,
    /// At least one end belongs to a sub-branch
    SubBranch,
    /// At least one end is in the Other column
    Other,
}

/// Stroke policy for an edge category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub stroke_width: f32,
    pub opacity: f32,
    pub dashed: bool,
}

impl EdgeKind {
    pub fn style(self) -> EdgeStyle {
        match self {
            EdgeKind::Mainline => EdgeStyle {
                stroke_width: 3.0,
                opacity: 1.0,
                dashed: false,
            },
            EdgeKind::CrossLineage => EdgeStyle {
                stroke_width: 2.0,
                opacity: 0.7,
                dashed: true,
            },
            EdgeKind::SubBranch => EdgeStyle {
                stroke_width: 2.0,
                opacity: 0.85,
                dashed: false,
            },
            EdgeKind::Other => EdgeStyle {
                stroke_width: 1.0,
                opacity: 0.5,
                dashed: true,
            },
        }
    }
}

/// Hover grouping key: edges sharing a group light up together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HighlightGroup {
    Lineage(usize),
    SubBranch(SubBranchId),
    Other,
}

/// An edge connecting two loaded commits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    /// Child commit hash
    pub from: String,
    /// Parent commit hash
    pub to: String,
    pub kind: EdgeKind,
    /// The parent is a non-first parent of the child
    pub merge: bool,
    pub group: HighlightGroup,
    /// `None` draws in the neutral colour
    pub color: Option<LineageColor>,
}

/// Classify every child -> parent pair whose ends are both loaded.
///
/// Edges are emitted in row order of the child, then parent order.
pub fn classify_edges(model: &Model, layout: &Layout) -> Vec<Edge> {
    let other = layout.other_column();
    let column_color = |column: usize| layout.columns.get(column).and_then(|c| c.color);
    let mut edges = Vec::new();

    for commit in model.commits() {
        let Some(child) = layout.placement(&commit.hash) else {
            continue;
        };
        for (idx, parent_hash) in commit.parents.iter().enumerate() {
            let Some(parent) = layout.placement(parent_hash) else {
                continue;
            };

            let sub_branch = child.sub_branch.or(parent.sub_branch);
            let (kind, group, color) = if let Some(id) = sub_branch {
                let column = if child.sub_branch.is_some() {
                    child.column
                } else {
                    parent.column
                };
                (
                    EdgeKind::SubBranch,
                    HighlightGroup::SubBranch(id),
                    column_color(column),
                )
            } else if child.column == other || parent.column == other {
                (EdgeKind::Other, HighlightGroup::Other, None)
            } else {
                let kind = if child.column == parent.column {
                    EdgeKind::Mainline
                } else {
                    EdgeKind::CrossLineage
                };
                (
                    kind,
                    HighlightGroup::Lineage(child.column),
                    column_color(child.column),
                )
            };

            edges.push(Edge {
                from: commit.hash.clone(),
                to: parent_hash.clone(),
                kind,
                merge: idx > 0,
                group,
                color,
            });
        }
    }

    edges
}
