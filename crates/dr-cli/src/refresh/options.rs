//! Resolution of run settings from flags, environment and dbt_project.yml.

use dr_core::{DbtProject, ModelDirs, Modifiers};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::common::{log_dir, non_blank};

/// Report file name used when no report path is configured.
const DEFAULT_REPORT_FILE: &str = "incremental_refresh_report.json";

/// Where the run writes its report and command logs.
///
/// Resolved from flags alone so the report can be written before the project
/// configuration is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputPaths {
    pub(crate) report_path: PathBuf,
    pub(crate) log_dir: PathBuf,
}

impl OutputPaths {
    pub(crate) fn resolve(cli: &Cli) -> Self {
        let log_dir = log_dir(&cli.global);
        let report_path = non_blank(cli.refresh.report_path.as_deref())
            .map(PathBuf::from)
            .unwrap_or_else(|| log_dir.join(DEFAULT_REPORT_FILE));
        Self {
            report_path,
            log_dir,
        }
    }
}

/// Fully resolved settings for one refresh run.
#[derive(Debug, Clone)]
pub(crate) struct RefreshOptions {
    pub(crate) project_dir: PathBuf,
    /// Base revision expression; `None` means the parent of `head`
    pub(crate) base: Option<String>,
    pub(crate) head: String,
    pub(crate) dry_run: bool,
    pub(crate) build_rest: bool,
    pub(crate) modifiers: Modifiers,
    pub(crate) model_dirs: ModelDirs,
    /// Manifest given on the command line
    pub(crate) manifest: Option<PathBuf>,
    /// Where dbt writes (and a dry run looks for) the manifest
    pub(crate) default_manifest: PathBuf,
    /// Fallback when the manifest carries no project name
    pub(crate) project_name: Option<String>,
}

impl RefreshOptions {
    /// Combine CLI flags with the project's `dbt_project.yml`.
    ///
    /// Flags win; `--model-path` replaces the configured model paths entirely.
    pub(crate) fn resolve(cli: &Cli, project: &DbtProject) -> Self {
        let project_dir = PathBuf::from(&cli.global.project_dir);
        let model_dirs = if cli.refresh.model_paths.is_empty() {
            ModelDirs::new(&project.model_paths)
        } else {
            ModelDirs::new(&cli.refresh.model_paths)
        };

        Self {
            default_manifest: project.manifest_path(&project_dir),
            project_dir,
            base: non_blank(cli.refresh.previous_commit.as_deref()).map(String::from),
            head: non_blank(Some(cli.refresh.head.as_str()))
                .unwrap_or("HEAD")
                .to_string(),
            dry_run: cli.refresh.dry_run,
            build_rest: cli.refresh.build_rest,
            modifiers: Modifiers {
                target: non_blank(cli.global.target.as_deref()).map(String::from),
                exclude: non_blank(cli.refresh.exclude.as_deref()).map(String::from),
            },
            model_dirs,
            manifest: non_blank(cli.refresh.manifest.as_deref()).map(PathBuf::from),
            project_name: project.name.clone(),
        }
    }

    /// Base revision expression actually compared against.
    pub(crate) fn base_revision(&self) -> String {
        self.base
            .clone()
            .unwrap_or_else(|| format!("{}~1", self.head))
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
