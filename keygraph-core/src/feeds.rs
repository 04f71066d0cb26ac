//! Fetching and decoding the commit, branch and pull request feeds.
//!
//! A failed command never fails the refresh: the feed comes back empty and
//! the failure is recorded so the status line can show it.

use crate::runner::{CommandOutput, CommandRunner};
use graph::{parse_branches, parse_commits, parse_pull_requests, Branch, Commit, PullRequest};
use serde::Serialize;
use std::fmt;
use tracing::warn;

pub const BRANCH_COMMAND: &str =
    "git for-each-ref --format='%(refname:short) %(objectname)' refs/heads refs/remotes";

pub const PULL_REQUEST_COMMAND: &str =
    "gh pr list --state open --limit 100 --json number,title,headRefName,headRefOid";

/// Log query over all refs, newest first, capped at `limit` commits
pub fn commit_log_command(limit: u64) -> String {
    format!("git log --all --date-order -n {limit} --format='%H|%P|%ct|%s'")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feed {
    Commits,
    Branches,
    PullRequests,
    Config,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feed::Commits => "commits",
            Feed::Branches => "branches",
            Feed::PullRequests => "pull requests",
            Feed::Config => "config",
        };
        f.write_str(name)
    }
}

/// A sub-fetch that produced no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub feed: Feed,
    pub error: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load {}: {}", self.feed, self.error)
    }
}

/// Feed data plus the failure that emptied it, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: Vec<T>,
    pub failure: Option<FetchFailure>,
}

impl<T> Fetched<T> {
    fn ok(data: Vec<T>) -> Self {
        Self {
            data,
            failure: None,
        }
    }

    fn failed(feed: Feed, error: impl Into<String>) -> Self {
        let failure = FetchFailure {
            feed,
            error: error.into(),
        };
        warn!(%failure, "feed unavailable");
        Self {
            data: Vec::new(),
            failure: Some(failure),
        }
    }
}

pub async fn fetch_commits(runner: &dyn CommandRunner, limit: u64) -> Fetched<Commit> {
    match runner.run(&commit_log_command(limit)).await {
        CommandOutput::Success(output) => Fetched::ok(parse_commits(output.lines())),
        CommandOutput::Failure(error) => Fetched::failed(Feed::Commits, error),
    }
}

pub async fn fetch_branches(runner: &dyn CommandRunner) -> Fetched<Branch> {
    match runner.run(BRANCH_COMMAND).await {
        CommandOutput::Success(output) => Fetched::ok(parse_branches(output.lines())),
        CommandOutput::Failure(error) => Fetched::failed(Feed::Branches, error),
    }
}

pub async fn fetch_pull_requests(runner: &dyn CommandRunner) -> Fetched<PullRequest> {
    match runner.run(PULL_REQUEST_COMMAND).await {
        CommandOutput::Success(output) => match parse_pull_requests(&output) {
            Ok(prs) => Fetched::ok(prs),
            Err(err) => Fetched::failed(Feed::PullRequests, err.to_string()),
        },
        CommandOutput::Failure(error) => Fetched::failed(Feed::PullRequests, error),
    }
}
