//! Error types for dr-core

use thiserror::Error;

use crate::report::ReportStatus;

/// Core error type for dbt-refresh
#[derive(Error, Debug)]
pub enum CoreError {
    /// R001: A revision did not resolve to a commit
    #[error("[R001] Invalid revision '{revision}': {reason}")]
    InvalidRevision { revision: String, reason: String },

    /// R002: No manifest could be obtained
    #[error("[R002] Manifest unavailable: {reason}")]
    ManifestUnavailable { reason: String },

    /// R003: An incremental model could not be mapped back to a changed file
    #[error("[R003] No changed source path matches model '{model}'")]
    PathResolutionMiss { model: String },

    /// R004: The combined full-refresh build failed
    #[error("[R004] Full refresh failed for {models} ({status}); see {log_path}")]
    RefreshExecutionFailed {
        models: String,
        status: String,
        log_path: String,
    },

    /// R005: The trailing full-project build failed after the refresh succeeded
    #[error(
        "[R005] Full refresh succeeded but the full project build failed ({status}); see {log_path}"
    )]
    FullBuildExecutionFailed { status: String, log_path: String },

    /// R006: Any other external command failure
    #[error("[R006] Command '{command}' failed: {message}")]
    ExecutionFailed { command: String, message: String },

    /// R007: Unrecognised command-line flag
    #[error("[R007] Unknown flag: {flag}")]
    UnknownFlag { flag: String },

    /// R008: Manifest JSON could not be decoded
    #[error("[R008] Failed to parse manifest '{path}': {message}")]
    ManifestParse { path: String, message: String },

    /// R009: dbt_project.yml could not be decoded
    #[error("[R009] Failed to parse project config '{path}': {message}")]
    ConfigParse { path: String, message: String },

    /// R010: The run report was already given a terminal status
    #[error("[R010] Run report already finalized with status '{status}'")]
    ReportFinalized { status: ReportStatus },

    /// R011: IO error
    #[error("[R011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// R012: IO error with file path context
    #[error("[R012] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// R013: Documentation coverage threshold outside 0..=1
    #[error("[R013] Invalid coverage threshold '{value}': expected a ratio between 0 and 1")]
    InvalidThreshold { value: String },

    /// R014: dbt-coverage report could not be decoded
    #[error("[R014] Failed to parse coverage report '{path}': {message}")]
    CoverageParse { path: String, message: String },

    /// R015: No coverage report could be produced
    #[error("[R015] Documentation coverage unavailable: {reason}")]
    CoverageUnavailable { reason: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Terminal report status recorded when this error ends the run.
    pub fn terminal_status(&self) -> ReportStatus {
        match self {
            CoreError::ManifestUnavailable { .. } => ReportStatus::Error,
            _ => ReportStatus::Failed,
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
