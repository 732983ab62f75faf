//! History Auditor helpers: mapping incremental models back to their changed
//! files and reading blob existence at the base revision as a verdict.

use crate::changes::MODEL_SOURCE_EXTENSION;
use crate::model_name::ModelName;
use crate::source_path::SourcePath;

/// Whether a model existed before the base revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceVerdict {
    /// The source file is new: no persisted state to refresh yet
    FirstDeployment,
    /// The source file existed at the base revision
    PreExisting,
}

impl ExistenceVerdict {
    /// Verdict from a blob-existence test at the base revision.
    pub fn from_blob_exists(exists: bool) -> Self {
        if exists {
            ExistenceVerdict::PreExisting
        } else {
            ExistenceVerdict::FirstDeployment
        }
    }
}

/// Find the changed path a model came from.
///
/// `recorded` is the node's `original_file_path` from the manifest. When one
/// of the changed paths equals it, that path wins. Otherwise the first path
/// named `<model>.sql`, either at the top level or after a `/`, is used.
pub fn resolve_source_path<'a>(
    model: &ModelName,
    recorded: Option<&str>,
    changed: &'a [SourcePath],
) -> Option<&'a SourcePath> {
    if let Some(exact) = recorded.and_then(|r| changed.iter().find(|path| path.as_str() == r)) {
        return Some(exact);
    }

    let file_name = format!("{}.{}", model, MODEL_SOURCE_EXTENSION);
    let suffix = format!("/{}", file_name);
    let found = changed
        .iter()
        .find(|path| path.as_str() == file_name || path.ends_with(&suffix));
    if let (Some(path), Some(recorded)) = (found, recorded) {
        log::warn!(
            "Manifest records {} at '{}' but the changed file is '{}'",
            model,
            recorded,
            path
        );
    }
    found
}
