//! Plain-text rendering of a snapshot, one commit per line.

use chrono::DateTime;
use graph::{Decoration, Placement};
use keygraph_core::Snapshot;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width reserved for the commit message
pub const MESSAGE_WIDTH: usize = 56;

/// Truncate to `max_width` display columns on grapheme boundaries,
/// ending with an ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if width + grapheme_width + 1 > max_width {
            break;
        }
        result.push_str(grapheme);
        width += grapheme_width;
    }
    result.push('…');
    result
}

fn pad_to_width(text: &str, target: usize) -> String {
    let text = truncate_to_width(text, target);
    let padding = target.saturating_sub(UnicodeWidthStr::width(text.as_str()));
    format!("{text}{}", " ".repeat(padding))
}

/// One cell per column: `●` lineage, `○` sub-branch, `·` Other
fn gutter(placement: &Placement, columns: usize) -> String {
    (0..columns)
        .map(|column| {
            if column != placement.column {
                ' '
            } else if placement.sub_branch.is_some() {
                '○'
            } else if column + 1 == columns {
                '·'
            } else {
                '●'
            }
        })
        .collect()
}

fn format_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "????-??-??".to_string())
}

fn format_decoration(decoration: &Decoration) -> String {
    let mut parts = Vec::new();
    if !decoration.branches.is_empty() {
        parts.push(format!("({})", decoration.branches.join(", ")));
    }
    if let Some(pr) = &decoration.pull_request {
        parts.push(format!("#{} {}", pr.number, pr.title));
    }
    parts.join(" ")
}

pub fn render_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let layout = &snapshot.graph.layout;
    let columns = layout.columns.len();

    let labels: Vec<&str> = layout.columns.iter().map(|c| c.label.as_str()).collect();
    let _ = writeln!(out, "columns: {}", labels.join(" | "));

    for commit in &snapshot.commits {
        let Some(placement) = layout.placement(&commit.hash) else {
            continue;
        };
        let mut line = format!(
            "{} {} {} {}",
            gutter(placement, columns),
            commit.short_hash(),
            format_date(commit.timestamp),
            pad_to_width(&commit.message, MESSAGE_WIDTH),
        );
        if let Some(decoration) = snapshot.decorations.get(&commit.hash) {
            let _ = write!(line, " {}", format_decoration(decoration));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }

    let _ = writeln!(
        out,
        "{} (zoom {:.2})",
        snapshot.status.summary(),
        snapshot.view.zoom
    );
    out
}
