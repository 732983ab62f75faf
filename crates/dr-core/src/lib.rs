//! dr-core - Core library for dbt-refresh
//!
//! This crate holds the decision logic behind an incremental full refresh:
//! filtering changed model sources, reading a compiled dbt manifest,
//! classifying changed models by materialization, re-resolving source paths
//! for the history audit, building the typed refresh plan and keeping the
//! run report. It also ranks models by documentation coverage. It never
//! spawns processes; external tools live in `dr-exec`.

pub mod audit;
pub mod changes;
pub mod classification;
pub mod config;
pub mod coverage;
pub mod error;
pub mod manifest;
pub mod model_name;
mod newtype_string;
pub mod node;
pub mod plan;
pub mod report;
pub mod source_path;

pub use audit::{resolve_source_path, ExistenceVerdict};
pub use changes::{filter_model_sources, ModelDirs, DEFAULT_MODEL_DIR, MODEL_SOURCE_EXTENSION};
pub use classification::{classify, classify_changes, ChangeClassification, Classification};
pub use config::DbtProject;
pub use coverage::{
    discover_coverage_paths, CoverageReport, CoverageSummary, CoverageThreshold,
    DocumentationGap, GapSeverity, DEFAULT_COVERAGE_THRESHOLD,
};
pub use error::{CoreError, CoreResult};
pub use manifest::{CompileFailure, Manifest, ManifestReader, ManifestSource};
pub use model_name::ModelName;
pub use node::NodeKey;
pub use plan::{DbtCommand, Modifiers, RefreshPlan};
pub use report::{FileReportSink, ReportSink, ReportStatus, ReportWriter, RunReport};
pub use source_path::SourcePath;
