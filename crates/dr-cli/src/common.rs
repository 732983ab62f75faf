//! Shared CLI utilities

use dr_core::CoreError;
use dr_exec::ExecError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Commands return `Err(ExitCode(N).into())` once the failure has been
/// reported; `main` turns it into the process exit status.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the failure was already reported.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Map a tool failure to the generic execution error.
pub(crate) fn exec_failure(command: &str, err: ExecError) -> CoreError {
    CoreError::ExecutionFailed {
        command: command.to_string(),
        message: err.to_string(),
    }
}

/// Directory for captured tool output: `--log-dir`, else `<project-dir>/logs`.
pub(crate) fn log_dir(global: &GlobalArgs) -> PathBuf {
    non_blank(global.log_dir.as_deref())
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&global.project_dir).join("logs"))
}

/// Treat empty or whitespace-only values (e.g. `DBT_TARGET=`) as unset.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
