//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

use dr_core::DEFAULT_COVERAGE_THRESHOLD;

/// dbt-refresh - full-refresh incremental dbt models whose SQL changed
///
/// Compares two revisions, finds changed incrementally materialized models
/// that already existed at the base revision, and rebuilds them with
/// `dbt build --full-refresh`. Run without a subcommand to refresh.
#[derive(Parser, Debug)]
#[command(name = "dbt-refresh")]
#[command(author, version, about)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute instead of a refresh
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Refresh options
    #[command(flatten)]
    pub refresh: RefreshArgs,
}

/// Options shared with every dbt invocation
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the dbt project directory
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "DBT_PROJECT_DIR",
        default_value = "."
    )]
    pub project_dir: String,

    /// dbt profile target passed to every dbt command
    #[arg(short, long, global = true, env = "DBT_TARGET")]
    pub target: Option<String>,

    /// dbt executable
    #[arg(long, global = true, env = "DBT_EXECUTABLE", default_value = "dbt")]
    pub dbt_executable: String,

    /// git executable
    #[arg(long, global = true, env = "GIT_EXECUTABLE", default_value = "git")]
    pub git_executable: String,

    /// Directory for captured tool output (default: <project-dir>/logs)
    #[arg(long, global = true, env = "DBT_REFRESH_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check column documentation coverage with dbt-coverage
    DocsCoverage(DocsCoverageArgs),
}

/// Arguments for the docs-coverage subcommand
#[derive(Args, Debug, Clone)]
pub struct DocsCoverageArgs {
    /// Minimum ratio of documented columns, between 0 and 1
    #[arg(
        long,
        env = "DOC_COVERAGE_THRESHOLD",
        value_name = "RATIO",
        default_value_t = DEFAULT_COVERAGE_THRESHOLD
    )]
    pub threshold: f64,

    /// Model directory whose subdirectories are checked (repeatable; default: model-paths from dbt_project.yml)
    #[arg(long = "model-path", value_name = "DIR")]
    pub model_paths: Vec<String>,

    /// Where dbt-coverage writes its JSON report (default: <log-dir>/documentation_coverage.json)
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    /// dbt-coverage executable
    #[arg(long, env = "DBT_COVERAGE_EXECUTABLE", default_value = "dbt-coverage")]
    pub coverage_executable: String,
}

/// Arguments controlling the refresh run
#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    /// Classify, audit and plan, but do not run any dbt build
    #[arg(long)]
    pub dry_run: bool,

    /// Base revision to compare against (default: parent of --head)
    #[arg(long, value_name = "REV")]
    pub previous_commit: Option<String>,

    /// Head revision
    #[arg(long, value_name = "REV", default_value = "HEAD")]
    pub head: String,

    /// Pre-built manifest.json (required for --dry-run unless one exists in the target path)
    #[arg(short, long, value_name = "PATH")]
    pub manifest: Option<String>,

    /// dbt exclusion selector passed to every dbt build
    #[arg(short, long, value_name = "SELECTOR")]
    pub exclude: Option<String>,

    /// Run a full project build after the refresh
    #[arg(long)]
    pub build_rest: bool,

    /// Model source directory to watch (repeatable; default: model-paths from dbt_project.yml)
    #[arg(long = "model-path", value_name = "DIR")]
    pub model_paths: Vec<String>,

    /// Where to write the JSON run report
    #[arg(long, env = "DBT_REFRESH_REPORT", value_name = "PATH")]
    pub report_path: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
