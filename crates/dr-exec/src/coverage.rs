//! `CoverageTool` backed by the `dbt-coverage` command line.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::ExecResult;
use crate::process::run_logged;
use crate::traits::{CommandOutcome, CoverageTool};

/// Log file step name for the coverage computation.
pub const STEP_DOCUMENTATION: &str = "dbt_documentation";

/// Runs `dbt-coverage compute doc` from the project directory.
///
/// dbt-coverage reads `target/manifest.json` and `target/catalog.json`, so
/// `dbt docs generate` must have run first.
#[derive(Debug, Clone)]
pub struct DbtCoverageCli {
    executable: String,
    project_dir: PathBuf,
    log_dir: PathBuf,
}

impl DbtCoverageCli {
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

    fn args(model_paths: &[String], threshold: f64, report_path: &Path) -> Vec<String> {
        let mut args = vec!["compute".to_string(), "doc".to_string()];
        for path in model_paths {
            args.push("--model-path-filter".to_string());
            args.push(path.clone());
        }
        args.extend([
            "--cov-format".to_string(),
            "markdown".to_string(),
            "--cov-fail-under".to_string(),
            threshold.to_string(),
            "--cov-report".to_string(),
            report_path.display().to_string(),
        ]);
        args
    }
}

#[async_trait]
impl CoverageTool for DbtCoverageCli {
    async fn compute_doc(
        &self,
        model_paths: &[String],
        threshold: f64,
        report_path: &Path,
    ) -> ExecResult<CommandOutcome> {
        let args = Self::args(model_paths, threshold, report_path);
        let log_path = self.log_dir.join(format!("{}.log", STEP_DOCUMENTATION));
        log::info!(
            "Running {} {} (output: {})",
            self.executable,
            args.join(" "),
            log_path.display()
        );
        run_logged(&self.executable, &args, &self.project_dir, &log_path).await
    }
}
