use crate::feeds::FetchFailure;
use chrono::{DateTime, Utc};
use graph::{
    Commit, Decoration, GraphLayout, InteractionState, KeySelection, Model, ModelStats,
    PullRequest, ViewState,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the application knows, owned by the controller
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub model: Model,
    pub pull_requests: Vec<PullRequest>,
    /// Selection made by the user; `None` means "use the configured default"
    pub explicit_selection: Option<KeySelection>,
    /// Selection the current layout was built from
    pub selection: KeySelection,
    pub interaction: InteractionState,
    pub graph: GraphLayout,
    pub status: Status,
}

/// What the status line shows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Status {
    pub commit_count: usize,
    /// Shape of the loaded window
    pub stats: ModelStats,
    pub failures: Vec<FetchFailure>,
    /// Integrity diagnostics from the last layout pass
    pub diagnostics: Vec<String>,
    /// Number of completed refreshes
    pub generation: u64,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Status {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty() || !self.diagnostics.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{} commits", self.commit_count);
        if let Some(at) = self.last_refresh {
            summary.push_str(&format!(", refreshed {}", at.format("%H:%M:%S")));
        }
        for failure in &self.failures {
            summary.push_str(&format!("; {failure}"));
        }
        for diagnostic in &self.diagnostics {
            summary.push_str(&format!("; {diagnostic}"));
        }
        summary
    }
}

/// Read-only copy of the state for a rendering adapter
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub commits: Vec<Commit>,
    pub selection: KeySelection,
    pub graph: GraphLayout,
    pub view: ViewState,
    pub decorations: BTreeMap<String, Decoration>,
    pub status: Status,
}
