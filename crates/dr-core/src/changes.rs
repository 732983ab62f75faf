//! Change collection: restricting a revision diff to model source files.
//!
//! The version-control query itself lives behind `dr_exec::VersionControl`;
//! this module owns the filtering rules applied to whatever it returns.

use crate::source_path::SourcePath;

/// Extension of dbt model source files.
pub const MODEL_SOURCE_EXTENSION: &str = "sql";

/// Conventional model directory used when none is configured.
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Normalized, non-empty list of model source directory prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirs(Vec<String>);

impl ModelDirs {
    /// Normalize configured directories.
    ///
    /// Leading `./` and trailing `/` are stripped and blanks dropped. An empty
    /// result falls back to [`DEFAULT_MODEL_DIR`].
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for dir in dirs {
            let dir = normalize_dir(dir.as_ref());
            if !dir.is_empty() && !normalized.contains(&dir) {
                normalized.push(dir);
            }
        }
        if normalized.is_empty() {
            normalized.push(DEFAULT_MODEL_DIR.to_string());
        }
        Self(normalized)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether `path` lies under one of the directories.
    pub fn contains(&self, path: &str) -> bool {
        let path = path.strip_prefix("./").unwrap_or(path);
        self.0.iter().any(|dir| {
            path.strip_prefix(dir.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl Default for ModelDirs {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

fn normalize_dir(dir: &str) -> String {
    let mut dir = dir.trim();
    while let Some(rest) = dir.strip_prefix("./") {
        dir = rest;
    }
    dir.trim_end_matches('/').to_string()
}

/// Keep the model source files among `paths`, preserving their order.
///
/// A path is kept when its extension is exactly [`MODEL_SOURCE_EXTENSION`]
/// and it lies under one of `dirs`. Repeated paths are kept once.
pub fn filter_model_sources<I, S>(paths: I, dirs: &ModelDirs) -> Vec<SourcePath>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<SourcePath> = Vec::new();
    for raw in paths {
        let raw = raw.as_ref().trim();
        let raw = raw.strip_prefix("./").unwrap_or(raw);
        let Some(path) = SourcePath::try_new(raw) else {
            continue;
        };
        if path.extension() != Some(MODEL_SOURCE_EXTENSION) || !dirs.contains(&path) {
            log::debug!("Ignoring non-model change: {}", path);
            continue;
        }
        if !kept.contains(&path) {
            kept.push(path);
        }
    }
    kept
}

#[cfg(test)]
#[path = "changes_test.rs"]
mod tests;
