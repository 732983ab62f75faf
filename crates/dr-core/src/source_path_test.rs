use super::*;

#[test]
fn test_model_name_from_nested_path() {
    let path = SourcePath::new("models/mart/orders.sql");
    assert_eq!(path.model_name().unwrap(), "orders");
}

#[test]
fn test_model_name_keeps_inner_dots() {
    let path = SourcePath::new("models/staging/stg_orders.v2.sql");
    assert_eq!(path.model_name().unwrap(), "stg_orders.v2");
}

#[test]
fn test_model_name_for_dotfile_is_none() {
    let path = SourcePath::new("models/.sql");
    assert!(path.model_name().is_none());
}

#[test]
fn test_extension() {
    assert_eq!(SourcePath::new("models/orders.sql").extension(), Some("sql"));
    assert_eq!(SourcePath::new("models/orders.SQL").extension(), Some("SQL"));
    assert_eq!(SourcePath::new("models/README").extension(), None);
}
