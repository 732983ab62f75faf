//! Collaborator traits for the refresh pipeline

use async_trait::async_trait;
use dr_core::DbtCommand;
use std::path::{Path, PathBuf};

use crate::error::ExecResult;

/// Read-only queries against version-control history.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Resolve a revision expression to a commit id.
    ///
    /// Fails with `ExecError::UnknownRevision` when it names no commit.
    async fn resolve_revision(&self, revision: &str) -> ExecResult<String>;

    /// Paths added or modified (not deleted) between two commits, limited to
    /// `dirs`, in lexicographic path order.
    async fn changed_files(&self, base: &str, head: &str, dirs: &[String])
        -> ExecResult<Vec<String>>;

    /// Whether `path` existed as a blob at `revision`.
    async fn blob_exists(&self, revision: &str, path: &str) -> ExecResult<bool>;
}

/// Runs dbt commands.
#[async_trait]
pub trait BuildTool: Send + Sync {
    /// Run `command`, capturing its output to a log file named after `step`.
    ///
    /// A non-zero exit is reported through [`CommandOutcome::success`], not
    /// as an error; only failing to run the tool at all is an error.
    async fn run(&self, command: &DbtCommand, step: &str) -> ExecResult<CommandOutcome>;
}

/// Computes column documentation coverage for a dbt project.
#[async_trait]
pub trait CoverageTool: Send + Sync {
    /// Compute coverage for the models under `model_paths` and write the JSON
    /// report to `report_path`.
    ///
    /// Coverage below `threshold` makes the tool exit non-zero; that is still
    /// an outcome, and the report is written either way.
    async fn compute_doc(
        &self,
        model_paths: &[String],
        threshold: f64,
        report_path: &Path,
    ) -> ExecResult<CommandOutcome>;
}

/// Result of running an external command to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Whether the command exited with status 0
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Where stdout and stderr were captured
    pub log_path: PathBuf,
}

impl CommandOutcome {
    /// Human-readable exit status, e.g. `exit code 2`.
    pub fn status_description(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}
