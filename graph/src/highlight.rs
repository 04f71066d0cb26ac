//! Hover highlight sets.

use crate::classify::SubBranch;
use crate::core::Model;
use crate::layout::Layout;
use std::collections::HashSet;

/// Commits to emphasise while `hovered` is under the pointer.
///
/// - sub-branch commit: its members plus merge commit and branch point
/// - Other-column commit: everything reachable through Other-only
///   parent/child links
/// - lineage commit: every lineage commit drawn in the same column
pub fn highlight_set(
    model: &Model,
    layout: &Layout,
    sub_branches: &[Vec<SubBranch>],
    hovered: &str,
) -> HashSet<String> {
    let Some(placement) = layout.placement(hovered) else {
        return HashSet::new();
    };

    if let Some(id) = placement.sub_branch {
        let Some(sub) = sub_branches.iter().flatten().find(|sub| sub.id == id) else {
            return HashSet::from([hovered.to_string()]);
        };
        return sub
            .commits
            .iter()
            .chain(&sub.merge_commit)
            .chain(&sub.branch_point)
            .cloned()
            .collect();
    }

    if placement.column == layout.other_column() {
        return other_chain(model, layout, hovered);
    }

    layout
        .placements
        .iter()
        .filter(|p| p.column == placement.column && p.sub_branch.is_none())
        .map(|p| p.hash.clone())
        .collect()
}

fn other_chain(model: &Model, layout: &Layout, start: &str) -> HashSet<String> {
    let mut seen = HashSet::from([start.to_string()]);
    let mut stack = vec![start.to_string()];

    while let Some(hash) = stack.pop() {
        let neighbours = model
            .loaded_parents(&hash)
            .chain(model.children(&hash).iter().map(String::as_str));
        for next in neighbours {
            if layout.is_other(next) && seen.insert(next.to_string()) {
                stack.push(next.to_string());
            }
        }
    }

    seen
}
