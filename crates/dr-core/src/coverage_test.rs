use super::*;
use tempfile::tempdir;

const REPORT: &str = r#"{
  "cov_type": "doc",
  "covered": 7,
  "total": 10,
  "coverage": 0.7,
  "tables": [
    {
      "name": "customers",
      "covered": 3,
      "total": 3,
      "coverage": 1.0,
      "columns": [
        {"name": "id", "coverage": 1.0},
        {"name": "name", "coverage": 1.0},
        {"name": "email", "coverage": 1.0}
      ]
    },
    {
      "name": "orders",
      "covered": 3,
      "total": 4,
      "coverage": 0.75,
      "columns": [
        {"name": "id", "coverage": 1.0},
        {"name": "amount", "coverage": 1.0},
        {"name": "status", "coverage": 1.0},
        {"name": "discount", "coverage": 0.0}
      ]
    },
    {
      "name": "events",
      "covered": 0,
      "total": 2,
      "coverage": 0.0,
      "columns": [
        {"name": "id", "coverage": 0.0},
        {"name": "payload", "coverage": 0.0}
      ]
    },
    {
      "name": "sessions",
      "covered": 1,
      "total": 1,
      "coverage": 0.95,
      "columns": [
        {"name": "id", "coverage": 0.0}
      ]
    }
  ]
}"#;

fn report() -> CoverageReport {
    serde_json::from_str(REPORT).unwrap()
}

#[test]
fn test_threshold_bounds() {
    assert_eq!(CoverageThreshold::default().value(), 0.9);
    assert_eq!(CoverageThreshold::new(0.0).unwrap().value(), 0.0);
    assert_eq!(CoverageThreshold::new(1.0).unwrap().percent(), 100.0);

    for bad in [1.5, -0.1, f64::NAN] {
        let err = CoverageThreshold::new(bad).unwrap_err();
        assert!(matches!(err, CoreError::InvalidThreshold { .. }));
    }
}

#[test]
fn test_severity_ranking() {
    let threshold = CoverageThreshold::default();
    assert_eq!(
        GapSeverity::for_coverage(0.0, threshold),
        GapSeverity::Critical
    );
    assert_eq!(
        GapSeverity::for_coverage(0.5, threshold),
        GapSeverity::Warning
    );
    assert_eq!(GapSeverity::for_coverage(0.9, threshold), GapSeverity::Minor);
    assert_eq!(GapSeverity::Critical.to_string(), "CRITICAL");
}

#[test]
fn test_analyze_orders_gaps_by_coverage() {
    let summary = CoverageSummary::analyze(&report(), CoverageThreshold::default());

    let models: Vec<&str> = summary.gaps.iter().map(|g| g.model.as_str()).collect();
    assert_eq!(models, vec!["events", "orders", "sessions"]);

    assert_eq!(summary.gaps[0].severity, GapSeverity::Critical);
    assert_eq!(summary.gaps[0].missing_columns, vec!["id", "payload"]);
    assert_eq!(summary.gaps[1].severity, GapSeverity::Warning);
    assert_eq!(summary.gaps[1].missing_columns, vec!["discount"]);
    assert_eq!(summary.gaps[2].severity, GapSeverity::Minor);
    assert_eq!((summary.covered, summary.total), (7, 10));
}

#[test]
fn test_passes_against_threshold() {
    let report = report();
    assert!(!CoverageSummary::analyze(&report, CoverageThreshold::default()).passes());
    assert!(CoverageSummary::analyze(&report, CoverageThreshold::new(0.7).unwrap()).passes());
}

#[test]
fn test_partially_documented_columns_are_not_missing() {
    let report: CoverageReport = serde_json::from_str(
        r#"{"coverage": 0.5, "tables": [
            {"name": "t", "coverage": 0.5, "columns": [{"name": "a", "coverage": 0.5}]}
        ]}"#,
    )
    .unwrap();
    let summary = CoverageSummary::analyze(&report, CoverageThreshold::default());
    assert!(summary.gaps.is_empty());
}

#[test]
fn test_load_invalid_report_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("coverage.json");
    std::fs::write(&path, "[1, 2").unwrap();

    let err = CoverageReport::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::CoverageParse { .. }));
}

#[test]
fn test_discover_immediate_model_subdirectories() {
    let dir = tempdir().unwrap();
    for sub in ["models/staging/stripe", "models/mart", "models/.cache", "marts/finance"] {
        std::fs::create_dir_all(dir.path().join(sub)).unwrap();
    }
    std::fs::write(dir.path().join("models/top_level.sql"), "select 1").unwrap();

    let dirs = ModelDirs::new(["models", "marts", "missing"]);
    let paths = discover_coverage_paths(dir.path(), &dirs).unwrap();
    assert_eq!(paths, vec!["marts/finance", "models/mart", "models/staging"]);
}
