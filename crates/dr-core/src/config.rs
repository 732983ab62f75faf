//! The subset of `dbt_project.yml` the refresh planner reads.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::changes::DEFAULT_MODEL_DIR;
use crate::error::{CoreError, CoreResult};

/// Project settings read from `dbt_project.yml`.
///
/// Every other key in the file is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DbtProject {
    /// Project name, the middle segment of manifest node keys
    #[serde(default)]
    pub name: Option<String>,

    /// Directories holding model SQL files
    #[serde(
        rename = "model-paths",
        alias = "source-paths",
        default = "default_model_paths"
    )]
    pub model_paths: Vec<String>,

    /// Directory dbt writes artifacts (including `manifest.json`) into
    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,
}

fn default_model_paths() -> Vec<String> {
    vec![DEFAULT_MODEL_DIR.to_string()]
}

fn default_target_path() -> String {
    "target".to_string()
}

impl Default for DbtProject {
    fn default() -> Self {
        Self {
            name: None,
            model_paths: default_model_paths(),
            target_path: default_target_path(),
        }
    }
}

impl DbtProject {
    /// File name dbt looks for in the project root.
    pub const FILE_NAME: &'static str = "dbt_project.yml";

    /// Load project settings from a file path.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Load `dbt_project.yml` from a project directory.
    ///
    /// A missing file yields defaults; the refresh can still run against an
    /// explicit manifest and the conventional `models` directory.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(Self::FILE_NAME);
        if !path.exists() {
            log::warn!(
                "{} not found, using default model and target paths",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    fn parse(content: &str, path: &Path) -> CoreResult<Self> {
        serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Default manifest location: `<project_dir>/<target-path>/manifest.json`.
    pub fn manifest_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.target_path).join("manifest.json")
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
