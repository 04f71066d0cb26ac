use super::{Branch, Commit};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// The loaded commit window plus lookup indices.
///
/// Rebuilt from scratch on every refresh; commits are never patched in place.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Commits sorted newest first. The position is the commit's row.
    commits: Vec<Commit>,
    /// Quick lookup: hash -> row
    rows: HashMap<String, usize>,
    branches: Vec<Branch>,
    /// Quick lookup: hash -> indices into `branches`
    branches_by_hash: HashMap<String, Vec<usize>>,
    /// Quick lookup: parent hash -> child hashes
    children: HashMap<String, Vec<String>>,
}

impl Model {
    pub fn new(mut commits: Vec<Commit>, branches: Vec<Branch>) -> Self {
        // Stable sort keeps feed order for equal timestamps.
        commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut rows = HashMap::with_capacity(commits.len());
        commits.retain(|commit| {
            if rows.contains_key(&commit.hash) {
                debug!(hash = %commit.hash, "dropping duplicate commit");
                return false;
            }
            rows.insert(commit.hash.clone(), rows.len());
            true
        });

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for commit in &commits {
            for parent in &commit.parents {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(commit.hash.clone());
            }
        }

        let mut branches_by_hash: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, branch) in branches.iter().enumerate() {
            branches_by_hash
                .entry(branch.hash.clone())
                .or_default()
                .push(idx);
        }

        Self {
            commits,
            rows,
            branches,
            branches_by_hash,
            children,
        }
    }

    /// Commits in row order (newest first)
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn get(&self, hash: &str) -> Option<&Commit> {
        self.rows.get(hash).map(|&row| &self.commits[row])
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.rows.contains_key(hash)
    }

    /// Row of a commit in the newest-first order
    pub fn row(&self, hash: &str) -> Option<usize> {
        self.rows.get(hash).copied()
    }

    /// Child hashes of a commit that are inside the loaded window
    pub fn children(&self, hash: &str) -> &[String] {
        self.children.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parents of a commit that are inside the loaded window
    pub fn loaded_parents<'a>(&'a self, hash: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.get(hash)
            .into_iter()
            .flat_map(|commit| commit.parents.iter())
            .map(String::as_str)
            .filter(move |parent| self.contains(parent))
    }

    /// Branches pointing at a commit
    pub fn branches_at(&self, hash: &str) -> impl Iterator<Item = &Branch> {
        self.branches_by_hash
            .get(hash)
            .into_iter()
            .flatten()
            .map(|&idx| &self.branches[idx])
    }

    /// Look up a branch by exact name
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }

    /// Get statistics about the window
    pub fn stats(&self) -> ModelStats {
        let merge_commits = self.commits.iter().filter(|c| c.is_merge()).count();
        let root_commits = self.commits.iter().filter(|c| c.is_root()).count();
        let dangling_parents = self
            .commits
            .iter()
            .flat_map(|c| c.parents.iter())
            .filter(|p| !self.contains(p))
            .count();

        ModelStats {
            total_commits: self.commits.len(),
            total_branches: self.branches.len(),
            merge_commits,
            root_commits,
            dangling_parents,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub total_commits: usize,
    pub total_branches: usize,
    pub merge_commits: usize,
    pub root_commits: usize,
    /// Parent references pointing outside the loaded window
    pub dangling_parents: usize,
}
