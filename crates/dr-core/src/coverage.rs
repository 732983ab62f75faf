//! Documentation coverage: ranking models by undocumented columns.
//!
//! The numbers come from a `dbt-coverage compute doc` JSON report. This
//! module only reads that report and decides what to flag; running the tool
//! lives in `dr-exec`.

use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use crate::changes::ModelDirs;
use crate::error::{CoreError, CoreResult};

/// Threshold used when none is configured.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.9;

/// Minimum documented-column ratio, between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageThreshold(f64);

impl CoverageThreshold {
    pub fn new(value: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::InvalidThreshold {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for CoverageThreshold {
    fn default() -> Self {
        Self(DEFAULT_COVERAGE_THRESHOLD)
    }
}

/// The parts of a dbt-coverage report that are read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageReport {
    #[serde(default)]
    pub covered: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub coverage: f64,
    #[serde(default)]
    pub tables: Vec<TableCoverage>,
}

/// Per-model entry of a coverage report
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableCoverage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coverage: f64,
    #[serde(default)]
    pub columns: Vec<ColumnCoverage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnCoverage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub coverage: f64,
}

impl CoverageReport {
    /// Load a report written by `dbt-coverage --cov-report`
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| CoreError::CoverageParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// How urgently a model's documentation needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapSeverity {
    /// No column is documented
    Critical,
    /// Below the threshold
    Warning,
    /// Meets the threshold but some columns lack docs
    Minor,
}

impl GapSeverity {
    pub fn for_coverage(coverage: f64, threshold: CoverageThreshold) -> Self {
        if coverage <= 0.0 {
            GapSeverity::Critical
        } else if coverage < threshold.value() {
            GapSeverity::Warning
        } else {
            GapSeverity::Minor
        }
    }
}

impl fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapSeverity::Critical => write!(f, "CRITICAL"),
            GapSeverity::Warning => write!(f, "WARNING"),
            GapSeverity::Minor => write!(f, "MINOR"),
        }
    }
}

/// A model with at least one undocumented column.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentationGap {
    pub model: String,
    pub coverage: f64,
    pub severity: GapSeverity,
    pub missing_columns: Vec<String>,
}

/// Project-wide verdict of a coverage report.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSummary {
    pub covered: u64,
    pub total: u64,
    pub coverage: f64,
    pub threshold: CoverageThreshold,
    /// Gaps ordered from least to most documented
    pub gaps: Vec<DocumentationGap>,
}

impl CoverageSummary {
    /// Rank the incompletely documented models of `report`.
    ///
    /// A model is listed only if it is below full coverage and at least one
    /// of its columns has no documentation at all.
    pub fn analyze(report: &CoverageReport, threshold: CoverageThreshold) -> Self {
        let mut gaps: Vec<DocumentationGap> = report
            .tables
            .iter()
            .filter(|table| table.coverage < 1.0)
            .filter_map(|table| {
                let missing_columns: Vec<String> = table
                    .columns
                    .iter()
                    .filter(|col| col.coverage <= 0.0)
                    .map(|col| col.name.clone())
                    .collect();
                if missing_columns.is_empty() {
                    return None;
                }
                Some(DocumentationGap {
                    model: table.name.clone(),
                    coverage: table.coverage,
                    severity: GapSeverity::for_coverage(table.coverage, threshold),
                    missing_columns,
                })
            })
            .collect();
        gaps.sort_by(|a, b| {
            a.coverage
                .partial_cmp(&b.coverage)
                .unwrap_or(Ordering::Equal)
        });

        Self {
            covered: report.covered,
            total: report.total,
            coverage: report.coverage,
            threshold,
            gaps,
        }
    }

    /// Whether project-wide coverage meets the threshold.
    pub fn passes(&self) -> bool {
        self.coverage >= self.threshold.value()
    }
}

/// Model directories handed to dbt-coverage as path filters.
///
/// These are the immediate subdirectories of each model directory, as paths
/// relative to `project_dir`, sorted. Missing model directories and hidden
/// subdirectories are skipped.
pub fn discover_coverage_paths(project_dir: &Path, dirs: &ModelDirs) -> CoreResult<Vec<String>> {
    let mut paths = Vec::new();
    for dir in dirs.as_slice() {
        let root = project_dir.join(dir);
        if !root.is_dir() {
            log::debug!("Model directory {} does not exist", root.display());
            continue;
        }
        let entries = std::fs::read_dir(&root).map_err(|e| CoreError::IoWithPath {
            path: root.display().to_string(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: root.display().to_string(),
                source: e,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            paths.push(format!("{}/{}", dir, name));
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "coverage_test.rs"]
mod tests;
