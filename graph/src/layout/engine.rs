use super::geometry::{Geometry, Point};
use super::offsets::OffsetAllocator;
use crate::classify::{SubBranch, SubBranchId};
use crate::core::Model;
use crate::lineage::{Lineage, LineageColor};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// Where a commit sits in the layout. Coordinates are in graph space;
/// pan and zoom are applied later by the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub hash: String,
    /// Lineage index, or the lineage count for the Other column
    pub column: usize,
    /// 0 for lineage and Other commits, >= 1 for sub-branch commits
    pub offset: u32,
    /// Global newest-first row
    pub row: usize,
    pub sub_branch: Option<SubBranchId>,
    pub position: Point,
}

/// One column header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub index: usize,
    pub label: String,
    /// `None` for the Other column
    pub color: Option<LineageColor>,
    pub x: f64,
    pub width: f64,
    pub max_offset: u32,
}

/// Result of a layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    /// One placement per commit, in row order
    pub placements: Vec<Placement>,
    pub columns: Vec<Column>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Layout {
    pub fn placement(&self, hash: &str) -> Option<&Placement> {
        self.index.get(hash).map(|&idx| &self.placements[idx])
    }

    /// Index of the Other column
    pub fn other_column(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    pub fn is_other(&self, hash: &str) -> bool {
        self.placement(hash)
            .is_some_and(|p| p.column == self.other_column())
    }

    /// Total graph-space width of all columns
    pub fn width(&self) -> f64 {
        self.columns.last().map_or(0.0, |c| c.x + c.width)
    }
}

/// Assign every commit a column, offset and row.
///
/// A pure function of its inputs; calling it twice gives identical output.
pub fn layout(
    model: &Model,
    lineages: &[Lineage],
    sub_branches: &[Vec<SubBranch>],
    geometry: &Geometry,
) -> Layout {
    let other = lineages.len();

    let mut placements: Vec<Placement> = model
        .commits()
        .iter()
        .enumerate()
        .map(|(row, commit)| Placement {
            hash: commit.hash.clone(),
            column: other,
            offset: 0,
            row,
            sub_branch: None,
            position: Point::ORIGIN,
        })
        .collect();

    // Lowest lineage index wins for commits shared by several lineages.
    for lineage in lineages.iter().rev() {
        for hash in &lineage.ordered {
            if let Some(row) = model.row(hash) {
                placements[row].column = lineage.index;
            }
        }
    }

    let mut max_offsets = vec![0u32; lineages.len()];
    for (column, subs) in sub_branches.iter().enumerate().take(lineages.len()) {
        let mut allocator = OffsetAllocator::new();
        for (sub, (first, last)) in ordered_spans(model, subs) {
            let offset = allocator.allocate(first, last);
            for hash in &sub.commits {
                if let Some(row) = model.row(hash) {
                    let placement = &mut placements[row];
                    placement.column = column;
                    placement.offset = offset;
                    placement.sub_branch = Some(sub.id);
                }
            }
        }
        max_offsets[column] = allocator.max_offset();
    }

    let columns = build_columns(lineages, &max_offsets, geometry);
    for placement in &mut placements {
        let column_x = columns[placement.column].x;
        placement.position = Point::new(
            geometry.offset_x(column_x, placement.offset),
            geometry.row_y(placement.row),
        );
    }

    debug!(
        commits = placements.len(),
        columns = columns.len(),
        "layout pass complete"
    );

    let index = placements
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.hash.clone(), idx))
        .collect();
    Layout {
        placements,
        columns,
        index,
    }
}

/// Row of the commit a sub-branch grows from: its branch point, or its
/// oldest member when it has none.
pub fn anchor_row(model: &Model, sub: &SubBranch) -> Option<usize> {
    sub.branch_point
        .as_deref()
        .and_then(|hash| model.row(hash))
        .or_else(|| sub.oldest_row(model))
}

/// Rows a sub-branch occupies: its anchor, its merge commit and every
/// member, including members committed after the merge.
pub fn sub_branch_span(model: &Model, sub: &SubBranch) -> Option<(usize, usize)> {
    let anchor = anchor_row(model, sub)?;
    let merge = sub.merge_commit.as_deref().and_then(|hash| model.row(hash));
    let rows = [Some(anchor), merge, sub.newest_row(model), sub.oldest_row(model)];
    let lo = rows.iter().flatten().min().copied()?;
    let hi = rows.iter().flatten().max().copied()?;
    Some((lo, hi))
}

/// Sub-branches with their spans, oldest anchor first, then discovery order.
fn ordered_spans<'s>(model: &Model, subs: &'s [SubBranch]) -> Vec<(&'s SubBranch, (usize, usize))> {
    let mut spans: Vec<_> = subs
        .iter()
        .filter_map(|sub| {
            let anchor = anchor_row(model, sub)?;
            sub_branch_span(model, sub).map(|span| (anchor, sub, span))
        })
        .collect();
    spans.sort_by_key(|&(anchor, sub, _)| (Reverse(anchor), sub.id));
    spans.into_iter().map(|(_, sub, span)| (sub, span)).collect()
}

fn build_columns(lineages: &[Lineage], max_offsets: &[u32], geometry: &Geometry) -> Vec<Column> {
    let mut columns = Vec::with_capacity(lineages.len() + 1);
    let mut x = geometry.left_padding;

    for (lineage, &max_offset) in lineages.iter().zip(max_offsets) {
        let width = geometry.column_width_for(max_offset);
        columns.push(Column {
            index: lineage.index,
            label: lineage.branch.clone(),
            color: Some(lineage.color),
            x,
            width,
            max_offset,
        });
        x += width;
    }

    columns.push(Column {
        index: lineages.len(),
        label: "Other".to_string(),
        color: None,
        x,
        width: geometry.column_width,
        max_offset: 0,
    });
    columns
}
