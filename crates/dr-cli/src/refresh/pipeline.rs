//! The refresh pipeline: collect changes, read the manifest, classify,
//! audit history, then plan and execute.
//!
//! Every stage either hands its result to the next or stops the run with a
//! terminal status. Stages that change the report persist it before returning
//! so a crash leaves the last completed stage visible.

use dr_core::{
    classify_changes, filter_model_sources, CompileFailure, CoreError, CoreResult, DbtCommand,
    ManifestReader, ManifestSource, ModelName, RefreshPlan, ReportStatus, ReportWriter,
    SourcePath,
};
use dr_exec::{BuildTool, ExecError, VersionControl};
use std::ops::ControlFlow;

use super::audit::{audit_history, AuditOutcome};
use super::execute::execute_plan;
use super::options::RefreshOptions;
use crate::common::exec_failure;

/// Log file step name for the manifest compile.
pub(crate) const STEP_COMPILE: &str = "dbt_compile";

/// A non-error terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stop {
    pub(crate) status: ReportStatus,
    pub(crate) message: String,
}

impl Stop {
    pub(crate) fn completed(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Completed,
            message: message.into(),
        }
    }

    pub(crate) fn skipped(message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Skipped,
            message: message.into(),
        }
    }
}

/// Outcome of a stage: continue with a value, or stop the run.
type Stage<T> = CoreResult<ControlFlow<Stop, T>>;

/// Unwrap a stage result, returning early from `drive` on a stop or error.
macro_rules! proceed {
    ($stage:expr) => {
        match $stage? {
            ControlFlow::Continue(value) => value,
            ControlFlow::Break(stop) => return Ok(stop),
        }
    };
}

/// Commit ids compared by the run.
#[derive(Debug, Clone)]
pub(crate) struct Revisions {
    pub(crate) base: String,
    pub(crate) head: String,
}

/// Wires the stages to their collaborators.
pub(crate) struct Pipeline<'a> {
    opts: &'a RefreshOptions,
    vcs: &'a dyn VersionControl,
    dbt: &'a dyn BuildTool,
}

impl<'a> Pipeline<'a> {
    pub(crate) fn new(
        opts: &'a RefreshOptions,
        vcs: &'a dyn VersionControl,
        dbt: &'a dyn BuildTool,
    ) -> Self {
        Self { opts, vcs, dbt }
    }

    /// Run every stage and finalize the report exactly once.
    ///
    /// Returns the terminal status. If the final report cannot be persisted
    /// the run counts as failed whatever the in-memory status says.
    pub(crate) async fn run(&self, writer: &mut ReportWriter<'_>) -> ReportStatus {
        let mut notes = Vec::new();
        let finalized = match self.drive(writer, &mut notes).await {
            Ok(stop) => {
                let message = with_notes(stop.message, &notes);
                log::info!("Run {}: {}", stop.status, message);
                writer.finish(stop.status, message)
            }
            Err(err) => {
                log::error!("{}", err);
                writer.fail(&err)
            }
        };

        match finalized {
            Ok(()) => writer.report().status(),
            Err(err) => {
                log::error!("Failed to finalize run report: {}", err);
                ReportStatus::Failed
            }
        }
    }

    /// Run the stages in order. Caveats that belong in the final message,
    /// whatever the outcome, are pushed to `notes`.
    async fn drive(
        &self,
        writer: &mut ReportWriter<'_>,
        notes: &mut Vec<String>,
    ) -> CoreResult<Stop> {
        let (revisions, changed) = proceed!(self.collect_changes(writer).await);
        let reader = proceed!(self.load_manifest().await);
        let incremental = proceed!(self.classify(writer, &reader, &changed, notes));

        log::debug!(
            "Auditing {} model(s) against {} (head {})",
            incremental.len(),
            short_rev(&revisions.base),
            short_rev(&revisions.head)
        );

        let refreshable =
            match audit_history(self.vcs, &reader, &revisions.base, &incremental, &changed)
                .await?
            {
                AuditOutcome::FirstDeployment(model) => {
                    return Ok(Stop::skipped(format!(
                        "Model '{}' does not exist at {}: first deployment is left to the \
                         regular deploy, no models were refreshed",
                        model,
                        short_rev(&revisions.base)
                    )));
                }
                AuditOutcome::Refresh(models) => models,
            };

        let Some(plan) = RefreshPlan::new(
            &refreshable,
            &self.opts.modifiers,
            self.opts.build_rest,
        ) else {
            return Ok(Stop::completed(
                "No incremental model could be matched to a changed file; nothing to refresh",
            ));
        };

        execute_plan(self.dbt, &plan, self.opts.dry_run, writer).await
    }

    /// Change Collector: resolve both revisions and list changed model files.
    async fn collect_changes(
        &self,
        writer: &mut ReportWriter<'_>,
    ) -> Stage<(Revisions, Vec<SourcePath>)> {
        let head = self.resolve_revision(&self.opts.head).await?;
        let base = self.resolve_revision(&self.opts.base_revision()).await?;
        log::debug!("Comparing {} against {}", head, base);

        let dirs = self.opts.model_dirs.as_slice();
        let raw = self
            .vcs
            .changed_files(&base, &head, dirs)
            .await
            .map_err(|e| exec_failure("git diff", e))?;
        let changed = filter_model_sources(raw, &self.opts.model_dirs);

        writer.update(|r| r.record_changed_files(&changed))?;
        log::info!("Found {} changed model file(s)", changed.len());

        if changed.is_empty() {
            return Ok(ControlFlow::Break(Stop::completed(format!(
                "No model files changed under {} between {} and {}; nothing to refresh",
                dirs.join(", "),
                short_rev(&base),
                short_rev(&head)
            ))));
        }

        Ok(ControlFlow::Continue((Revisions { base, head }, changed)))
    }

    async fn resolve_revision(&self, revision: &str) -> CoreResult<String> {
        self.vcs
            .resolve_revision(revision)
            .await
            .map_err(|e| match e {
                ExecError::UnknownRevision { revision, stderr } => CoreError::InvalidRevision {
                    revision,
                    reason: stderr,
                },
                other => exec_failure("git rev-parse", other),
            })
    }

    /// Manifest Reader: obtain and load the manifest.
    ///
    /// A failed compile is read as initial project setup and skips the run.
    async fn load_manifest(&self) -> Stage<ManifestReader> {
        let source = ManifestSource::resolve(
            self.opts.manifest.as_deref(),
            &self.opts.default_manifest,
            self.opts.dry_run,
        )?;

        if let ManifestSource::Compile(path) = &source {
            let command = DbtCommand::compile(&self.opts.modifiers);
            let outcome = self
                .dbt
                .run(&command, STEP_COMPILE)
                .await
                .map_err(|e| exec_failure(&command.to_string(), e))?;

            if !outcome.success {
                let failure = CompileFailure::from_failed_compile(&outcome.log_path);
                log::warn!("{} ({})", failure.message(), outcome.status_description());
                return Ok(ControlFlow::Break(Stop::skipped(failure.message())));
            }
            if !path.exists() {
                return Err(CoreError::ManifestUnavailable {
                    reason: format!(
                        "dbt compile succeeded but wrote no manifest at '{}'",
                        path.display()
                    ),
                });
            }
        }

        log::debug!("Loading manifest from {}", source.path().display());
        let reader = ManifestReader::load(source.path(), self.opts.project_name.as_deref())?;
        Ok(ControlFlow::Continue(reader))
    }

    /// Classifier: keep the incremental models.
    fn classify(
        &self,
        writer: &mut ReportWriter<'_>,
        reader: &ManifestReader,
        changed: &[SourcePath],
        notes: &mut Vec<String>,
    ) -> Stage<Vec<ModelName>> {
        let classification = classify_changes(reader, changed);
        log::info!(
            "{} incremental model(s) changed, {} other model(s) changed",
            classification.incremental.len(),
            classification.other_count
        );
        if !classification.ambiguous.is_empty() {
            let names: Vec<&str> = classification
                .ambiguous
                .iter()
                .map(ModelName::as_str)
                .collect();
            let note = format!(
                "ambiguous model name(s) {}: more than one changed file maps to each, \
                 classified by the first",
                names.join(", ")
            );
            log::warn!("{}", note);
            notes.push(note);
        }

        writer.update(|r| r.record_incremental_models(&classification.incremental))?;

        if classification.incremental.is_empty() {
            return Ok(ControlFlow::Break(Stop::completed(format!(
                "No incremental models changed; {} other model change(s) are left to the regular build",
                classification.other_count
            ))));
        }

        Ok(ControlFlow::Continue(classification.incremental))
    }
}

/// Append caveats to a terminal message.
fn with_notes(message: String, notes: &[String]) -> String {
    if notes.is_empty() {
        message
    } else {
        format!("{} (warning: {})", message, notes.join("; "))
    }
}

/// Abbreviate a commit id for messages.
pub(crate) fn short_rev(rev: &str) -> &str {
    if rev.len() == 40 && rev.chars().all(|c| c.is_ascii_hexdigit()) {
        &rev[..12]
    } else {
        rev
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
