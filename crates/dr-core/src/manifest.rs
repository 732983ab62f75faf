//! Manifest Reader: lookups into a compiled dbt `manifest.json`.
//!
//! Only the fields needed to classify changed models are deserialized; the
//! rest of dbt's (large) manifest is ignored.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::node::NodeKey;

/// The parts of a dbt manifest the refresh planner reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Manifest metadata (project name, dbt version)
    #[serde(default)]
    pub metadata: ManifestMetadata,

    /// All compiled nodes keyed by `<resource_type>.<project>.<name>`
    #[serde(default)]
    pub nodes: HashMap<String, ManifestNode>,
}

/// Manifest `metadata` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestMetadata {
    /// Name of the root dbt project
    #[serde(default)]
    pub project_name: Option<String>,
}

/// A single manifest node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestNode {
    /// Resolved node config
    #[serde(default)]
    pub config: NodeConfig,

    /// Source file path relative to the project root
    #[serde(default)]
    pub original_file_path: Option<String>,
}

/// Resolved config of a manifest node
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    /// Materialization strategy tag (free-form; dbt adapters may add their own)
    #[serde(default)]
    pub materialized: Option<String>,
}

impl Manifest {
    /// Load a manifest from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| CoreError::ManifestParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// A loaded manifest with its project name resolved.
///
/// Loaded once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    manifest: Manifest,
    project_name: String,
}

impl ManifestReader {
    /// Wrap a manifest, resolving the project name.
    ///
    /// The manifest's own `metadata.project_name` wins; `fallback` (normally
    /// the `name` from `dbt_project.yml`) is used when it is missing. Without
    /// either, node keys cannot be formed and the manifest is unusable.
    pub fn new(manifest: Manifest, fallback: Option<&str>) -> CoreResult<Self> {
        let project_name = manifest
            .metadata
            .project_name
            .as_deref()
            .or(fallback)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .ok_or_else(|| CoreError::ManifestUnavailable {
                reason: "manifest has no metadata.project_name and no project name is configured"
                    .to_string(),
            })?;

        Ok(Self {
            manifest,
            project_name,
        })
    }

    /// Load and wrap the manifest at `path`.
    pub fn load(path: &Path, fallback: Option<&str>) -> CoreResult<Self> {
        Self::new(Manifest::load(path)?, fallback)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Materialization tag of a node, or `None` when the node is absent or
    /// carries no tag.
    pub fn materialization_of(&self, key: &NodeKey) -> Option<&str> {
        self.manifest
            .nodes
            .get(&key.to_string())
            .and_then(|node| node.config.materialized.as_deref())
    }

    /// Source file of a node relative to the project root, as dbt recorded it.
    pub fn source_path_of(&self, key: &NodeKey) -> Option<&str> {
        self.manifest
            .nodes
            .get(&key.to_string())
            .and_then(|node| node.original_file_path.as_deref())
            .filter(|path| !path.is_empty())
    }
}

/// Where this run's manifest comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A manifest supplied with `--manifest`
    Explicit(PathBuf),
    /// An existing manifest at the project's default location
    DefaultLocation(PathBuf),
    /// Run `dbt compile` first, then read the manifest it writes here
    Compile(PathBuf),
}

impl ManifestSource {
    /// Decide how to obtain the manifest.
    ///
    /// - An explicit path is used as-is and must exist.
    /// - A dry run never compiles: it needs an explicit manifest or one at the
    ///   default location, otherwise the manifest is unavailable.
    /// - A real run always compiles so the manifest matches the checked-out code.
    pub fn resolve(
        explicit: Option<&Path>,
        default_path: &Path,
        dry_run: bool,
    ) -> CoreResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CoreError::ManifestUnavailable {
                    reason: format!("manifest '{}' does not exist", path.display()),
                });
            }
            return Ok(ManifestSource::Explicit(path.to_path_buf()));
        }

        if dry_run {
            if default_path.exists() {
                return Ok(ManifestSource::DefaultLocation(default_path.to_path_buf()));
            }
            return Err(CoreError::ManifestUnavailable {
                reason: format!(
                    "dry run does not compile; pass --manifest or provide '{}'",
                    default_path.display()
                ),
            });
        }

        Ok(ManifestSource::Compile(default_path.to_path_buf()))
    }

    /// Path the manifest is read from once obtained.
    pub fn path(&self) -> &Path {
        match self {
            ManifestSource::Explicit(p)
            | ManifestSource::DefaultLocation(p)
            | ManifestSource::Compile(p) => p,
        }
    }
}

/// How a failed `dbt compile` is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileFailure {
    /// Treated as a first project setup: nothing to refresh yet
    InitialSetup { message: String },
}

impl CompileFailure {
    /// Interpret a failed compile.
    ///
    /// The exit status alone cannot tell a project with no prior schema apart
    /// from a genuine compile error. Every failure is read as initial setup,
    /// which ends the run as skipped; the captured log is named so a real
    /// compile error can still be found.
    pub fn from_failed_compile(log_path: &Path) -> Self {
        CompileFailure::InitialSetup {
            message: format!(
                "dbt compile failed; assuming initial project setup with no existing schema, \
                 skipping full refresh (compile output: {})",
                log_path.display()
            ),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileFailure::InitialSetup { message } => message,
        }
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
