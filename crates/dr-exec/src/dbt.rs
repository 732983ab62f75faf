//! `BuildTool` backed by the dbt command line.

use async_trait::async_trait;
use dr_core::DbtCommand;
use std::path::PathBuf;

use crate::error::ExecResult;
use crate::process::run_logged;
use crate::traits::{BuildTool, CommandOutcome};

/// Runs dbt from the project directory, logging each step to `log_dir`.
#[derive(Debug, Clone)]
pub struct DbtCli {
    executable: String,
    project_dir: PathBuf,
    log_dir: PathBuf,
}

impl DbtCli {
    pub fn new(
        executable: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            project_dir: project_dir.into(),
            log_dir: log_dir.into(),
        }
    }

    /// Log file for a pipeline step.
    pub fn log_path(&self, step: &str) -> PathBuf {
        self.log_dir.join(format!("{}.log", step))
    }
}

#[async_trait]
impl BuildTool for DbtCli {
    async fn run(&self, command: &DbtCommand, step: &str) -> ExecResult<CommandOutcome> {
        let log_path = self.log_path(step);
        log::info!("Running {} (output: {})", command, log_path.display());
        run_logged(&self.executable, &command.args(), &self.project_dir, &log_path).await
    }
}
