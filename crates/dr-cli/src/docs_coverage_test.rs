use super::*;
use async_trait::async_trait;
use dr_exec::{CommandOutcome, ExecResult};
use std::sync::Mutex;
use tempfile::{tempdir, TempDir};

/// Coverage tool that writes a canned report.
struct FakeCoverage {
    report: Option<&'static str>,
    success: bool,
    calls: Mutex<Vec<(Vec<String>, f64)>>,
}

impl FakeCoverage {
    fn writing(report: &'static str, success: bool) -> Self {
        Self {
            report: Some(report),
            success,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CoverageTool for FakeCoverage {
    async fn compute_doc(
        &self,
        model_paths: &[String],
        threshold: f64,
        report_path: &Path,
    ) -> ExecResult<CommandOutcome> {
        self.calls
            .lock()
            .unwrap()
            .push((model_paths.to_vec(), threshold));
        if let Some(report) = self.report {
            std::fs::write(report_path, report).unwrap();
        }
        Ok(CommandOutcome {
            success: self.success,
            exit_code: Some(if self.success { 0 } else { 1 }),
            log_path: PathBuf::from("logs/dbt_documentation.log"),
        })
    }
}

const WELL_DOCUMENTED: &str = r#"{"covered": 19, "total": 20, "coverage": 0.95, "tables": [
  {"name": "orders", "coverage": 0.95, "columns": [{"name": "discount", "coverage": 0.0}]}
]}"#;

const POORLY_DOCUMENTED: &str = r#"{"covered": 1, "total": 4, "coverage": 0.25, "tables": [
  {"name": "events", "coverage": 0.0, "columns": [{"name": "id", "coverage": 0.0}]},
  {"name": "orders", "coverage": 0.5, "columns": [{"name": "amount", "coverage": 0.0}]}
]}"#;

fn project() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("models/mart")).unwrap();
    std::fs::create_dir_all(dir.path().join("models/staging")).unwrap();
    dir
}

#[tokio::test]
async fn test_passes_above_threshold() {
    let dir = project();
    let report_path = dir.path().join("coverage.json");
    let tool = FakeCoverage::writing(WELL_DOCUMENTED, true);

    let summary = check_coverage(
        &tool,
        dir.path(),
        &ModelDirs::default(),
        CoverageThreshold::default(),
        &report_path,
    )
    .await
    .unwrap();

    assert!(summary.passes());
    assert_eq!(summary.gaps.len(), 1);
    assert_eq!(summary.gaps[0].severity, GapSeverity::Minor);

    let calls = tool.calls.lock().unwrap();
    assert_eq!(calls[0].0, vec!["models/mart", "models/staging"]);
    assert_eq!(calls[0].1, 0.9);
}

#[tokio::test]
async fn test_failing_tool_still_yields_ranked_gaps() {
    let dir = project();
    let report_path = dir.path().join("coverage.json");
    let tool = FakeCoverage::writing(POORLY_DOCUMENTED, false);

    let summary = check_coverage(
        &tool,
        dir.path(),
        &ModelDirs::default(),
        CoverageThreshold::default(),
        &report_path,
    )
    .await
    .unwrap();

    assert!(!summary.passes());
    let ranked: Vec<(&str, GapSeverity)> = summary
        .gaps
        .iter()
        .map(|g| (g.model.as_str(), g.severity))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("events", GapSeverity::Critical),
            ("orders", GapSeverity::Warning)
        ]
    );
}

#[tokio::test]
async fn test_stale_report_is_not_reused() {
    let dir = project();
    let report_path = dir.path().join("coverage.json");
    std::fs::write(&report_path, WELL_DOCUMENTED).unwrap();
    let tool = FakeCoverage {
        report: None,
        success: false,
        calls: Mutex::new(Vec::new()),
    };

    let err = check_coverage(
        &tool,
        dir.path(),
        &ModelDirs::default(),
        CoverageThreshold::default(),
        &report_path,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::CoverageUnavailable { .. }));
    assert!(err.to_string().contains("logs/dbt_documentation.log"));
}

#[tokio::test]
async fn test_no_model_subdirectories_skips_tool() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("models")).unwrap();
    let tool = FakeCoverage::writing(WELL_DOCUMENTED, true);

    let err = check_coverage(
        &tool,
        dir.path(),
        &ModelDirs::default(),
        CoverageThreshold::default(),
        &dir.path().join("coverage.json"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CoreError::CoverageUnavailable { .. }));
    assert!(tool.calls.lock().unwrap().is_empty());
}

#[test]
fn test_relative_report_path_is_made_absolute() {
    let path = absolute(PathBuf::from("logs/coverage.json")).unwrap();
    assert!(path.is_absolute());
    assert!(path.ends_with("logs/coverage.json"));
}
