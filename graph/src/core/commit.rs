use serde::Serialize;
use smallvec::SmallVec;

/// Parent list; almost every commit has one or two parents.
pub type Parents = SmallVec<[String; 2]>;

/// A commit in the loaded window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Unique commit hash
    pub hash: String,
    /// Parent hashes, first parent first. May point outside the loaded window.
    pub parents: Parents,
    /// Commit time in seconds since the epoch; the only ordering key
    pub timestamp: i64,
    /// Commit subject
    pub message: String,
}

impl Commit {
    pub fn new<I, S>(
        hash: impl Into<String>,
        parents: I,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hash: hash.into(),
            parents: parents.into_iter().map(Into::into).collect(),
            timestamp,
            message: message.into(),
        }
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    /// Parents after the first one, i.e. the merged-in side of a merge
    pub fn merged_parents(&self) -> impl Iterator<Item = &str> {
        self.parents.iter().skip(1).map(String::as_str)
    }

    /// First eight characters of the hash, for display
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(8) {
            Some((end, _)) => &self.hash[..end],
            None => &self.hash,
        }
    }
}
