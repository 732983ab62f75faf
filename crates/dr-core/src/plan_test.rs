use super::*;

fn models(names: &[&str]) -> Vec<ModelName> {
    names.iter().map(|n| ModelName::new(*n)).collect()
}

#[test]
fn test_refresh_command_args() {
    let plan = RefreshPlan::new(&models(&["orders"]), &Modifiers::default(), false).unwrap();
    assert_eq!(
        plan.refresh().args(),
        vec!["build", "--select", "orders", "--full-refresh"]
    );
    assert_eq!(plan.refresh().to_string(), "dbt build --select orders --full-refresh");
    assert!(plan.build_rest().is_none());
}

#[test]
fn test_selector_keeps_model_order() {
    let plan = RefreshPlan::new(
        &models(&["orders", "events", "accounts"]),
        &Modifiers::default(),
        false,
    )
    .unwrap();
    assert_eq!(
        plan.refresh().selector().as_deref(),
        Some("orders,events,accounts")
    );
}

#[test]
fn test_modifiers_apply_to_every_command() {
    let modifiers = Modifiers {
        target: Some("prod".to_string()),
        exclude: Some("tag:nightly".to_string()),
    };
    let plan = RefreshPlan::new(&models(&["orders"]), &modifiers, true).unwrap();

    assert_eq!(
        plan.refresh().args(),
        vec![
            "build",
            "--select",
            "orders",
            "--full-refresh",
            "--target",
            "prod",
            "--exclude",
            "tag:nightly"
        ]
    );
    assert_eq!(
        plan.build_rest().unwrap().args(),
        vec!["build", "--target", "prod", "--exclude", "tag:nightly"]
    );
}

#[test]
fn test_empty_models_have_no_plan() {
    assert!(RefreshPlan::new(&[], &Modifiers::default(), true).is_none());
}

#[test]
fn test_compile_ignores_exclude() {
    let modifiers = Modifiers {
        target: Some("dev".to_string()),
        exclude: Some("staging".to_string()),
    };
    let cmd = DbtCommand::compile(&modifiers);
    assert_eq!(cmd.args(), vec!["compile", "--target", "dev"]);
}

#[test]
fn test_display_quotes_unsafe_arguments() {
    let modifiers = Modifiers {
        target: None,
        exclude: Some("path:models/legacy tag:old".to_string()),
    };
    let cmd = DbtCommand::build(&modifiers);
    assert_eq!(
        cmd.to_string(),
        "dbt build --exclude 'path:models/legacy tag:old'"
    );
    // The argument list itself is never quoted.
    assert_eq!(cmd.args()[2], "path:models/legacy tag:old");
}
