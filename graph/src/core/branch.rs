use serde::{Deserialize, Serialize};

/// A named ref pointing at a commit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Branch {
    /// Ref name, possibly with a remote prefix (`origin/main`)
    pub name: String,
    /// Hash of the commit the ref points to
    pub hash: String,
}

impl Branch {
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.name.contains('/')
    }

    /// Name with the first remote segment removed (`origin/main` -> `main`)
    pub fn short_name(&self) -> &str {
        self.name
            .split_once('/')
            .map(|(_, rest)| rest)
            .unwrap_or(&self.name)
    }
}

/// Pull request decoration, keyed by the hash of its head commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(rename = "headRefName")]
    pub head_ref_name: String,
    #[serde(rename = "headRefOid")]
    pub head_ref_oid: String,
}
