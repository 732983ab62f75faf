//! History Auditor: separate first deployments from genuine modifications.

use dr_core::{
    resolve_source_path, CoreError, CoreResult, ExistenceVerdict, ManifestReader, ModelName,
    NodeKey, SourcePath,
};
use dr_exec::VersionControl;

use crate::common::exec_failure;

/// Result of auditing a batch of incremental models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AuditOutcome {
    /// Every audited model existed at the base revision
    Refresh(Vec<ModelName>),
    /// This model is new; the whole batch is vetoed
    FirstDeployment(ModelName),
}

/// Audit `models` against the base revision, in order.
///
/// Each model is mapped back to its changed file, preferring the path the
/// manifest records for it. The first model whose source file is absent at
/// `base` vetoes the whole batch and auditing stops there. A model that
/// cannot be mapped back to a changed file is logged and left out.
pub(crate) async fn audit_history(
    vcs: &dyn VersionControl,
    reader: &ManifestReader,
    base: &str,
    models: &[ModelName],
    changed: &[SourcePath],
) -> CoreResult<AuditOutcome> {
    let mut refreshable = Vec::with_capacity(models.len());

    for model in models {
        let key = NodeKey::model(reader.project_name(), model);
        let Some(path) = resolve_source_path(model, reader.source_path_of(&key), changed) else {
            let miss = CoreError::PathResolutionMiss {
                model: model.to_string(),
            };
            log::warn!("{}; skipping", miss);
            continue;
        };

        let exists = vcs
            .blob_exists(base, path)
            .await
            .map_err(|e| exec_failure("git cat-file", e))?;

        match ExistenceVerdict::from_blob_exists(exists) {
            ExistenceVerdict::FirstDeployment => {
                log::info!("{} ({}) is new since {}", model, path, base);
                return Ok(AuditOutcome::FirstDeployment(model.clone()));
            }
            ExistenceVerdict::PreExisting => {
                log::debug!("{} ({}) existed at {}", model, path, base);
                refreshable.push(model.clone());
            }
        }
    }

    Ok(AuditOutcome::Refresh(refreshable))
}
