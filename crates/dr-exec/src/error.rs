//! Error types for dr-exec

use thiserror::Error;

/// External tool errors
#[derive(Error, Debug)]
pub enum ExecError {
    /// The executable could not be started (X001)
    #[error("[X001] Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// A revision did not resolve to a commit (X002)
    #[error("[X002] Unknown revision '{revision}': {stderr}")]
    UnknownRevision { revision: String, stderr: String },

    /// A git query exited non-zero (X003)
    #[error("[X003] git {args} failed: {stderr}")]
    Git { args: String, stderr: String },

    /// Captured output could not be written (X004)
    #[error("[X004] Failed to write command log '{path}': {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },

    /// Tool output was not valid UTF-8 (X005)
    #[error("[X005] {program} produced non UTF-8 output")]
    InvalidOutput { program: String },
}

/// Result type alias for ExecError
pub type ExecResult<T> = Result<T, ExecError>;
