use super::*;
use crate::model_name::ModelName;
use tempfile::tempdir;

const MANIFEST: &str = r#"{
  "metadata": {"project_name": "myproj", "dbt_version": "1.7.4"},
  "nodes": {
    "model.myproj.orders": {
      "config": {"materialized": "incremental"},
      "original_file_path": "models/mart/orders.sql"
    },
    "model.myproj.customers": {
      "config": {"materialized": "table"}
    },
    "model.myproj.events": {
      "config": {"materialized": "Incremental"}
    },
    "test.myproj.not_null_orders_id": {
      "config": {}
    }
  },
  "sources": {},
  "macros": {}
}"#;

fn reader() -> ManifestReader {
    let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
    ManifestReader::new(manifest, None).unwrap()
}

#[test]
fn test_project_name_from_metadata() {
    let reader = reader();
    assert_eq!(reader.project_name(), "myproj");
}

#[test]
fn test_source_path_lookup() {
    let reader = reader();
    let orders = NodeKey::model("myproj", &ModelName::new("orders"));
    let customers = NodeKey::model("myproj", &ModelName::new("customers"));

    assert_eq!(reader.source_path_of(&orders), Some("models/mart/orders.sql"));
    assert_eq!(reader.source_path_of(&customers), None);
}

#[test]
fn test_materialization_lookup() {
    let reader = reader();
    let orders = NodeKey::model("myproj", &ModelName::new("orders"));
    let customers = NodeKey::model("myproj", &ModelName::new("customers"));
    let missing = NodeKey::model("myproj", &ModelName::new("missing"));

    assert_eq!(reader.materialization_of(&orders), Some("incremental"));
    assert_eq!(reader.materialization_of(&customers), Some("table"));
    assert_eq!(reader.materialization_of(&missing), None);
}

#[test]
fn test_node_without_materialization_is_absent() {
    let manifest: Manifest = serde_json::from_str(
        r#"{"metadata": {"project_name": "p"}, "nodes": {"model.p.a": {}}}"#,
    )
    .unwrap();
    let reader = ManifestReader::new(manifest, None).unwrap();
    let key = NodeKey::model("p", &ModelName::new("a"));
    assert_eq!(reader.materialization_of(&key), None);
}

#[test]
fn test_project_name_fallback() {
    let manifest: Manifest = serde_json::from_str(r#"{"nodes": {}}"#).unwrap();
    let reader = ManifestReader::new(manifest, Some("from_config")).unwrap();
    assert_eq!(reader.project_name(), "from_config");
}

#[test]
fn test_missing_project_name_is_unavailable() {
    let manifest: Manifest = serde_json::from_str(r#"{"nodes": {}}"#).unwrap();
    let err = ManifestReader::new(manifest, None).unwrap_err();
    assert!(matches!(err, CoreError::ManifestUnavailable { .. }));
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, MANIFEST).unwrap();

    let reader = ManifestReader::load(&path, None).unwrap();
    assert_eq!(reader.project_name(), "myproj");
}

#[test]
fn test_load_invalid_json_is_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = Manifest::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ManifestParse { .. }));
}

#[test]
fn test_source_explicit_must_exist() {
    let dir = tempdir().unwrap();
    let explicit = dir.path().join("missing.json");
    let default = dir.path().join("target/manifest.json");

    let err = ManifestSource::resolve(Some(&explicit), &default, true).unwrap_err();
    assert!(matches!(err, CoreError::ManifestUnavailable { .. }));

    std::fs::write(&explicit, "{}").unwrap();
    let source = ManifestSource::resolve(Some(&explicit), &default, false).unwrap();
    assert_eq!(source, ManifestSource::Explicit(explicit.clone()));
    assert_eq!(source.path(), explicit.as_path());
}

#[test]
fn test_source_dry_run_uses_default_location() {
    let dir = tempdir().unwrap();
    let default = dir.path().join("manifest.json");
    std::fs::write(&default, "{}").unwrap();

    let source = ManifestSource::resolve(None, &default, true).unwrap();
    assert_eq!(source, ManifestSource::DefaultLocation(default));
}

#[test]
fn test_source_dry_run_without_manifest_is_unavailable() {
    let dir = tempdir().unwrap();
    let default = dir.path().join("target/manifest.json");

    let err = ManifestSource::resolve(None, &default, true).unwrap_err();
    assert!(matches!(err, CoreError::ManifestUnavailable { .. }));
}

#[test]
fn test_source_real_run_compiles() {
    let dir = tempdir().unwrap();
    let default = dir.path().join("manifest.json");
    std::fs::write(&default, "{}").unwrap();

    let source = ManifestSource::resolve(None, &default, false).unwrap();
    assert_eq!(source, ManifestSource::Compile(default));
}

#[test]
fn test_compile_failure_reads_as_initial_setup() {
    let failure = CompileFailure::from_failed_compile(Path::new("logs/dbt_compile.log"));
    assert!(failure.message().contains("initial project setup"));
    assert!(failure.message().contains("logs/dbt_compile.log"));
}
