//! Parsers for the raw text feeds.
//!
//! Malformed lines are skipped without error; a truncated trailing line from
//! the log command is expected now and then.

use super::{Branch, Commit, PullRequest};

/// Field separator of the commit feed
pub const FIELD_DELIMITER: char = '|';

const COMMIT_FIELDS: usize = 4;

/// Parse `hash|parents|timestamp|message` lines.
///
/// Returned commits are in feed order; [`Model::new`](super::Model::new)
/// establishes the canonical newest-first order.
pub fn parse_commits<'a, I>(lines: I) -> Vec<Commit>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().filter_map(parse_commit_line).collect()
}

fn parse_commit_line(line: &str) -> Option<Commit> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.splitn(COMMIT_FIELDS, FIELD_DELIMITER).collect();
    if fields.len() < COMMIT_FIELDS {
        return None;
    }

    let hash = fields[0].trim();
    if hash.is_empty() {
        return None;
    }
    let timestamp = fields[2].trim().parse::<i64>().ok()?;

    Some(Commit::new(
        hash,
        fields[1].split_whitespace(),
        timestamp,
        fields[3],
    ))
}

/// Parse `refname hash` lines. Symbolic `HEAD` refs are dropped.
pub fn parse_branches<'a, I>(lines: I) -> Vec<Branch>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let hash = parts.next()?;
            if name == "HEAD" || name.ends_with("/HEAD") {
                return None;
            }
            Some(Branch::new(name, hash))
        })
        .collect()
}

/// Decode the pull request feed (a JSON array).
pub fn parse_pull_requests(json: &str) -> Result<Vec<PullRequest>, serde_json::Error> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json)
}
