use crate::error::{CoreError, Result};
use graph::MAX_KEY_BRANCHES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the repository root
pub const CONFIG_FILE: &str = ".keygraph.toml";

pub const DEFAULT_COMMIT_LIMIT: u64 = 1000;
pub const MAX_COMMIT_LIMIT: u64 = 100_000_000;

fn default_commit_limit() -> u64 {
    DEFAULT_COMMIT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default key branch selection, in column order
    #[serde(default, alias = "keyBranches")]
    pub key_branches: Vec<String>,
    /// Maximum number of commits requested from the log
    #[serde(default = "default_commit_limit", alias = "commitLimit")]
    pub commit_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_branches: Vec::new(),
            commit_limit: DEFAULT_COMMIT_LIMIT,
        }
    }
}

impl Config {
    /// Parse and validate TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file; a missing file gives the defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COMMIT_LIMIT).contains(&self.commit_limit) {
            return Err(CoreError::InvalidCommitLimit(self.commit_limit));
        }
        if self.key_branches.len() > MAX_KEY_BRANCHES {
            return Err(CoreError::TooManyKeyBranches {
                got: self.key_branches.len(),
                max: MAX_KEY_BRANCHES,
            });
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        key_branches: Vec<String>,
        commit_limit: Option<u64>,
    ) -> Result<Self> {
        if !key_branches.is_empty() {
            self.key_branches = key_branches;
        }
        if let Some(limit) = commit_limit {
            self.commit_limit = limit;
        }
        self.validate()?;
        Ok(self)
    }
}
