//! First-parent lineages of the selected key branches.

use crate::core::Model;
use crate::error::GraphError;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use tracing::warn;

/// At most this many key branches get a dedicated column.
pub const MAX_KEY_BRANCHES: usize = 3;

/// Fixed display colour of a lineage column; serialized as its hex value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineageColor {
    Blue,
    Green,
    Orange,
}

impl LineageColor {
    pub const PALETTE: [LineageColor; MAX_KEY_BRANCHES] =
        [LineageColor::Blue, LineageColor::Green, LineageColor::Orange];

    pub fn for_index(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    pub fn hex(self) -> &'static str {
        match self {
            LineageColor::Blue => "#4f8cff",
            LineageColor::Green => "#3fb950",
            LineageColor::Orange => "#d29922",
        }
    }
}

impl Serialize for LineageColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// Ordered, deduplicated selection of up to three key branch names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeySelection {
    names: Vec<String>,
}

impl KeySelection {
    /// Build a selection, keeping the first [`MAX_KEY_BRANCHES`] distinct names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for name in names {
            let name = name.into();
            if selection.names.contains(&name) {
                continue;
            }
            if selection.names.len() == MAX_KEY_BRANCHES {
                warn!(branch = %name, "ignoring key branch beyond the first {}", MAX_KEY_BRANCHES);
                continue;
            }
            selection.names.push(name);
        }
        selection
    }

    /// Configured names that exist in the model, or `main`/`master` as a fallback
    pub fn default_for(model: &Model, configured: &[String]) -> Self {
        let present: Vec<&String> = configured
            .iter()
            .filter(|name| model.branch(name).is_some())
            .collect();
        if !present.is_empty() {
            return Self::new(present.into_iter().cloned());
        }
        ["main", "master"]
            .into_iter()
            .find(|name| model.branch(name).is_some())
            .map(|name| Self::new([name]))
            .unwrap_or_default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The first-parent chain of one key branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lineage {
    /// Column index, equal to the position among resolved lineages
    pub index: usize,
    pub branch: String,
    pub tip: String,
    pub color: LineageColor,
    /// Hashes from tip to the oldest loaded ancestor
    pub ordered: Vec<String>,
    #[serde(skip)]
    members: HashSet<String>,
}

impl Lineage {
    pub fn contains(&self, hash: &str) -> bool {
        self.members.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn members(&self) -> &HashSet<String> {
        &self.members
    }
}

/// Follow first parents from `tip` until a commit is missing from the window.
///
/// The walk is bounded by the window size; exceeding it (or revisiting a
/// commit) means the parent data is cyclic.
pub fn trace_lineage(tip: &str, model: &Model) -> Result<HashSet<String>, GraphError> {
    trace_ordered(tip, model).map(|ordered| ordered.into_iter().collect())
}

fn trace_ordered(tip: &str, model: &Model) -> Result<Vec<String>, GraphError> {
    let limit = model.len();
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    let mut current = model.get(tip);

    while let Some(commit) = current {
        if ordered.len() >= limit || !seen.insert(commit.hash.as_str()) {
            return Err(GraphError::RunawayTraversal {
                start: tip.to_string(),
                limit,
            });
        }
        ordered.push(commit.hash.clone());
        current = commit.first_parent().and_then(|parent| model.get(parent));
    }

    Ok(ordered)
}

/// Resolve a selection into lineages.
///
/// Unknown branch names and runaway walks are reported and skipped; the
/// remaining lineages are numbered consecutively.
pub fn resolve_lineages(
    model: &Model,
    selection: &KeySelection,
    diagnostics: &mut Vec<GraphError>,
) -> Vec<Lineage> {
    let mut lineages = Vec::new();

    for name in selection.names() {
        let Some(branch) = model.branch(name) else {
            warn!(branch = %name, "key branch not found");
            diagnostics.push(GraphError::UnknownBranch(name.clone()));
            continue;
        };

        match trace_ordered(&branch.hash, model) {
            Ok(ordered) => {
                let index = lineages.len();
                lineages.push(Lineage {
                    index,
                    branch: name.clone(),
                    tip: branch.hash.clone(),
                    color: LineageColor::for_index(index),
                    members: ordered.iter().cloned().collect(),
                    ordered,
                });
            }
            Err(err) => {
                warn!(branch = %name, error = %err, "dropping lineage");
                diagnostics.push(err);
            }
        }
    }

    lineages
}
