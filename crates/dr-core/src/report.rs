//! Run report: the single mutable record of a refresh run.
//!
//! The report is persisted after every mutation so an orchestrator watching
//! the file always sees the last completed stage, even after a crash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::model_name::ModelName;
use crate::source_path::SourcePath;

/// Status of a refresh run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Run is in progress
    Starting,
    /// Run finished, including "nothing to do" outcomes
    Completed,
    /// Run stopped on a business rule (first deployment, initial setup)
    Skipped,
    /// Run could not obtain its inputs
    Error,
    /// A fatal error ended the run
    Failed,
}

impl ReportStatus {
    /// Whether this status ends a run.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReportStatus::Starting)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Starting => write!(f, "starting"),
            ReportStatus::Completed => write!(f, "completed"),
            ReportStatus::Skipped => write!(f, "skipped"),
            ReportStatus::Error => write!(f, "error"),
            ReportStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Persisted record of a refresh run.
///
/// Arrays only grow and the status leaves `starting` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    execution_time: DateTime<Utc>,
    dry_run: bool,
    changed_files: Vec<SourcePath>,
    incremental_models: Vec<ModelName>,
    refresh_commands: Vec<String>,
    status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    errors: Vec<String>,
}

impl RunReport {
    /// Start a new report with status `starting`.
    pub fn new(dry_run: bool) -> Self {
        Self {
            execution_time: Utc::now(),
            dry_run,
            changed_files: Vec::new(),
            incremental_models: Vec::new(),
            refresh_commands: Vec::new(),
            status: ReportStatus::Starting,
            message: None,
            errors: Vec::new(),
        }
    }

    pub fn execution_time(&self) -> DateTime<Utc> {
        self.execution_time
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn changed_files(&self) -> &[SourcePath] {
        &self.changed_files
    }

    pub fn incremental_models(&self) -> &[ModelName] {
        &self.incremental_models
    }

    pub fn refresh_commands(&self) -> &[String] {
        &self.refresh_commands
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn record_changed_files(&mut self, files: &[SourcePath]) {
        self.changed_files.extend_from_slice(files);
    }

    pub fn record_incremental_models(&mut self, models: &[ModelName]) {
        self.incremental_models.extend_from_slice(models);
    }

    pub fn record_command(&mut self, command: impl Into<String>) {
        self.refresh_commands.push(command.into());
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Set the terminal status and message.
    ///
    /// Fails if the report is already terminal or `status` is `starting`.
    pub fn finalize(&mut self, status: ReportStatus, message: impl Into<String>) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::ReportFinalized {
                status: self.status,
            });
        }
        if !status.is_terminal() {
            return Err(CoreError::ReportFinalized { status });
        }
        self.status = status;
        self.message = Some(message.into());
        Ok(())
    }

    /// Record a fatal error and finalize with the error's terminal status.
    pub fn fail(&mut self, error: &CoreError) -> CoreResult<()> {
        let message = error.to_string();
        self.record_error(message.clone());
        self.finalize(error.terminal_status(), message)
    }
}

/// Capability to persist a report snapshot.
pub trait ReportSink: Send + Sync {
    /// Persist `report`, replacing any earlier snapshot.
    fn persist(&self, report: &RunReport) -> CoreResult<()>;
}

/// Persists the report as pretty JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct FileReportSink {
    path: PathBuf,
}

impl FileReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileReportSink {
    /// Write to a sibling temp file, then rename over the destination.
    ///
    /// Readers see either the previous or the new document, never a partial one.
    /// The temp file name carries the process id so concurrent runs sharing a
    /// directory do not clobber each other's staging file.
    fn persist(&self, report: &RunReport) -> CoreResult<()> {
        let path = &self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let temp_path = path.with_extension(format!("json.{}.tmp", std::process::id()));
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(&temp_path, &json).map_err(|e| CoreError::IoWithPath {
            path: temp_path.display().to_string(),
            source: e,
        })?;
        std::fs::rename(&temp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            }
        })?;
        Ok(())
    }
}

/// Owns the run's report and flushes it to a sink after every change.
pub struct ReportWriter<'a> {
    report: RunReport,
    sink: &'a dyn ReportSink,
}

impl<'a> ReportWriter<'a> {
    /// Start a report and persist its initial `starting` snapshot.
    pub fn start(dry_run: bool, sink: &'a dyn ReportSink) -> CoreResult<Self> {
        let report = RunReport::new(dry_run);
        sink.persist(&report)?;
        Ok(Self { report, sink })
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Apply a mutation and persist the result.
    pub fn update<F>(&mut self, mutate: F) -> CoreResult<()>
    where
        F: FnOnce(&mut RunReport),
    {
        mutate(&mut self.report);
        self.sink.persist(&self.report)
    }

    /// Finalize with a business-rule or success status and persist.
    pub fn finish(&mut self, status: ReportStatus, message: impl Into<String>) -> CoreResult<()> {
        self.report.finalize(status, message)?;
        self.sink.persist(&self.report)
    }

    /// Record a fatal error, finalize and persist.
    ///
    /// If the report is already terminal the error is still appended so it is
    /// not lost, and the finalize error is returned.
    pub fn fail(&mut self, error: &CoreError) -> CoreResult<()> {
        let finalized = self.report.fail(error);
        self.sink.persist(&self.report)?;
        finalized
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
