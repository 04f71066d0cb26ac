use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Outcome of running an external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Success(String),
    Failure(String),
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutput::Success(_))
    }
}

/// Runs version-control and code-hosting commands for the feeds
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> CommandOutput;
}

/// Runs commands through `sh -c` inside a repository directory
pub struct ShellRunner {
    repo_path: PathBuf,
}

impl ShellRunner {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> CommandOutput {
        debug!(%command, dir = %self.repo_path.display(), "running");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.repo_path)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                CommandOutput::Success(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if stderr.is_empty() {
                    CommandOutput::Failure(format!("command exited with {}", output.status))
                } else {
                    CommandOutput::Failure(stderr)
                }
            }
            Err(err) => CommandOutput::Failure(err.to_string()),
        }
    }
}
