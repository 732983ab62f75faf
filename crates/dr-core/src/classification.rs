//! Classifier: which changed models are incrementally materialized.

use std::collections::HashSet;

use crate::manifest::ManifestReader;
use crate::model_name::ModelName;
use crate::node::NodeKey;
use crate::source_path::SourcePath;

/// The only materialization tag that triggers a full refresh.
pub const INCREMENTAL: &str = "incremental";

/// Classification of a changed model against the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClassification {
    /// Not incremental, or absent from the manifest
    NotIncremental,
    /// Manifest tag is exactly `incremental`
    Incremental,
}

/// Classify a single model.
///
/// The comparison is exact and case-sensitive.
pub fn classify(reader: &ManifestReader, model: &ModelName) -> ChangeClassification {
    let key = NodeKey::model(reader.project_name(), model);
    match reader.materialization_of(&key) {
        Some(INCREMENTAL) => ChangeClassification::Incremental,
        Some(other) => {
            log::debug!("{} is materialized as '{}'", key, other);
            ChangeClassification::NotIncremental
        }
        None => {
            log::debug!("{} not found in manifest", key);
            ChangeClassification::NotIncremental
        }
    }
}

/// Result of classifying a run's changed files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Incremental models in the order their files were changed
    pub incremental: Vec<ModelName>,

    /// Number of changed models that are not incremental
    pub other_count: usize,

    /// Model names produced by more than one changed path
    pub ambiguous: Vec<ModelName>,
}

/// Partition changed files into incremental models and the rest.
///
/// When two paths collapse to the same model name, the first occurrence is
/// classified and the repeat is recorded in [`Classification::ambiguous`].
pub fn classify_changes(reader: &ManifestReader, changed: &[SourcePath]) -> Classification {
    let mut result = Classification::default();
    let mut seen: HashSet<ModelName> = HashSet::new();

    for path in changed {
        let Some(model) = path.model_name() else {
            log::warn!("Cannot derive a model name from '{}', ignoring", path);
            continue;
        };

        if !seen.insert(model.clone()) {
            log::warn!(
                "'{}' maps to model '{}' which another changed file already maps to",
                path,
                model
            );
            if !result.ambiguous.contains(&model) {
                result.ambiguous.push(model);
            }
            continue;
        }

        match classify(reader, &model) {
            ChangeClassification::Incremental => result.incremental.push(model),
            ChangeClassification::NotIncremental => result.other_count += 1,
        }
    }

    result
}

#[cfg(test)]
#[path = "classification_test.rs"]
mod tests;
