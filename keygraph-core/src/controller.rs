use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::feeds::{fetch_branches, fetch_commits, fetch_pull_requests, FetchFailure};
use crate::runner::CommandRunner;
use crate::state::{AppState, Snapshot, Status};
use chrono::Utc;
use graph::{
    Geometry, GraphError, GraphLayout, InteractionEvent, KeySelection, Model, RefDecorator,
    ViewState,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Outcome of a completed refresh
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    pub commits: usize,
    pub branches: usize,
    pub pull_requests: usize,
    pub failures: Vec<FetchFailure>,
    pub diagnostics: Vec<GraphError>,
}

/// Clears the in-flight flag when the refresh ends, including on cancellation
struct RefreshGuard<'a>(&'a AtomicBool);

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CoreError::RefreshInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the application state and drives fetch, layout and interaction
pub struct Controller<R> {
    runner: R,
    config: Config,
    config_failure: Option<FetchFailure>,
    geometry: Geometry,
    state: Mutex<AppState>,
    refreshing: AtomicBool,
}

impl<R: CommandRunner> Controller<R> {
    pub fn new(runner: R, config: Config) -> Self {
        Self {
            runner,
            config,
            config_failure: None,
            geometry: Geometry::default(),
            state: Mutex::new(AppState::default()),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Report a configuration load failure in every status
    pub fn with_config_failure(mut self, failure: Option<FetchFailure>) -> Self {
        self.config_failure = failure;
        self
    }

    /// Start with an explicit key selection instead of the configured default
    pub fn with_selection<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.explicit_selection = Some(KeySelection::new(names));
        self
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Fetch all feeds and replace the model wholesale.
    ///
    /// Only one refresh runs at a time; a concurrent call is rejected with
    /// [`CoreError::RefreshInFlight`]. Feed failures do not fail the refresh,
    /// they leave that feed empty and show up in the status.
    pub async fn refresh(&self) -> Result<RefreshReport> {
        let _guard = RefreshGuard::acquire(&self.refreshing)?;

        let runner: &dyn CommandRunner = &self.runner;
        let (commits, branches, pull_requests) = tokio::join!(
            fetch_commits(runner, self.config.commit_limit),
            fetch_branches(runner),
            fetch_pull_requests(runner),
        );

        let failures: Vec<FetchFailure> = self
            .config_failure
            .iter()
            .cloned()
            .chain(
                [commits.failure, branches.failure, pull_requests.failure]
                    .into_iter()
                    .flatten(),
            )
            .collect();
        let model = Model::new(commits.data, branches.data);
        let branch_count = model.branches().len();
        let pr_count = pull_requests.data.len();

        let mut state = self.lock();
        let selection = state
            .explicit_selection
            .clone()
            .unwrap_or_else(|| KeySelection::default_for(&model, &self.config.key_branches));
        let graph = GraphLayout::build(&model, &selection, &self.geometry);
        let diagnostics = graph.diagnostics.clone();

        let status = Status {
            commit_count: model.len(),
            stats: model.stats(),
            failures: failures.clone(),
            diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
            generation: state.status.generation + 1,
            last_refresh: Some(Utc::now()),
        };
        if status.is_degraded() {
            warn!(status = %status.summary(), "refresh completed with problems");
        } else {
            info!(
                commits = model.len(),
                merges = status.stats.merge_commits,
                dangling_parents = status.stats.dangling_parents,
                "refresh completed"
            );
        }

        let report = RefreshReport {
            commits: model.len(),
            branches: branch_count,
            pull_requests: pr_count,
            failures,
            diagnostics,
        };

        // the view and any explicit selection carry over
        state.model = model;
        state.pull_requests = pull_requests.data;
        state.selection = selection;
        state.graph = graph;
        state.status = status;
        Ok(report)
    }

    /// Replace the key branch selection and re-run the layout.
    ///
    /// Returns the diagnostics of the new layout pass (unknown names etc).
    pub fn select_branches<I, S>(&self, names: I) -> Vec<GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selection = KeySelection::new(names);
        let mut state = self.lock();
        let graph = GraphLayout::build(&state.model, &selection, &self.geometry);
        let diagnostics = graph.diagnostics.clone();

        state.status.diagnostics = diagnostics.iter().map(ToString::to_string).collect();
        state.explicit_selection = Some(selection.clone());
        state.selection = selection;
        state.graph = graph;
        diagnostics
    }

    /// Apply a pointer/touch/wheel event. Only the view transform changes.
    pub fn handle_event(&self, event: InteractionEvent) -> ViewState {
        let mut state = self.lock();
        state.interaction = state.interaction.apply(event);
        state.interaction.view
    }

    /// Set the vertical zoom, anchored at the top of the view
    pub fn zoom_to(&self, zoom: f64) -> ViewState {
        let mut state = self.lock();
        state.interaction.view = state.interaction.view.zoomed_at(zoom, 0.0);
        state.interaction.view
    }

    pub fn highlight(&self, hovered: &str) -> HashSet<String> {
        let state = self.lock();
        state.graph.highlight_set(&state.model, hovered)
    }

    pub fn status(&self) -> Status {
        self.lock().status.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.lock();
        let decorator = RefDecorator::new(&state.pull_requests, &state.graph.lineages);
        Snapshot {
            commits: state.model.commits().to_vec(),
            selection: state.selection.clone(),
            graph: state.graph.clone(),
            view: state.interaction.view,
            decorations: decorator
                .decorate_all(&state.model, &state.graph.layout)
                .into_iter()
                .collect(),
            status: state.status.clone(),
        }
    }
}
