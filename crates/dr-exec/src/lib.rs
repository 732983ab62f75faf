//! dr-exec - External tool layer for dbt-refresh
//!
//! This crate provides the `VersionControl`, `BuildTool` and `CoverageTool`
//! traits the commands depend on, and implementations that shell out to the
//! `git`, `dbt` and `dbt-coverage` executables.

pub mod coverage;
pub mod dbt;
pub mod error;
pub mod git;
pub(crate) mod process;
pub mod traits;

pub use coverage::{DbtCoverageCli, STEP_DOCUMENTATION};
pub use dbt::DbtCli;
pub use error::{ExecError, ExecResult};
pub use git::GitCli;
pub use traits::{BuildTool, CommandOutcome, CoverageTool, VersionControl};
