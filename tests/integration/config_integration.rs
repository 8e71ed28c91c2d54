//! Integration tests for configuration loading and validation

use autotitle::config::ValidationError;
use autotitle::{ConfigLoader, EvaluationFailurePolicy, TitleGenerator, TitleStatus};
use tempfile::TempDir;

use super::test_utils::{with_isolated_config_home, write_workspace_config, ARTICLE_CONFIG};

#[test]
fn test_load_from_file_reads_bundles_and_labels() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("autotitle.toml");
    std::fs::write(&config_file, ARTICLE_CONFIG).unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.bundles.entries().len(), 3);
    assert_eq!(
        config.labels.bundles["node"]["page"],
        "Basic page".to_string()
    );

    let engine = TitleGenerator::from_config(&config);
    assert_eq!(engine.status("node", "article").unwrap(), TitleStatus::Enabled);
    assert_eq!(engine.status("node", "page").unwrap(), TitleStatus::Optional);
    assert_eq!(engine.status("node", "event").unwrap(), TitleStatus::Disabled);
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load_from_file(&temp_dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_unknown_status_rejected() {
    let err = ConfigLoader::from_toml_str(
        r#"
[bundles.node.article]
status = 7
"#,
    )
    .unwrap_err();
    assert!(matches!(err, autotitle::TitleError::ConfigError(_)));
}

#[test]
fn test_php_alias_and_validation() {
    let config = ConfigLoader::from_toml_str(
        r#"
[bundles.node.article]
status = 1
pattern = "[node:id]"
php = true
"#,
    )
    .unwrap();
    assert!(config.bundles.0["node"]["article"].dynamic_code);

    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(&errors[0], ValidationError::Bundle(key, _) if key == "node.article"));
}

#[test]
fn test_engine_section_enables_dynamic_code() {
    let config = ConfigLoader::from_toml_str(
        r#"
[engine]
allow_dynamic_code = true
evaluation_failure = "keep_expanded"

[bundles.node.article]
status = 1
pattern = "[node:id]"
dynamic_code = true
"#,
    )
    .unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.engine.evaluation_failure,
        EvaluationFailurePolicy::KeepExpanded
    );
}

#[test]
fn test_workspace_load_uses_defaults_without_files() {
    with_isolated_config_home(|_| {
        let workspace = TempDir::new().unwrap();
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert!(config.bundles.entries().is_empty());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.output, "stderr");
        assert!(!config.engine.allow_dynamic_code);
    });
}

#[test]
fn test_workspace_file_overrides_global_file() {
    with_isolated_config_home(|config_home| {
        let global_dir = config_home.join("autotitle");
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(
            global_dir.join("config.toml"),
            r#"
[bundles.node.article]
status = 2
pattern = "Global"

[bundles.node.blog]
status = 1
"#,
        )
        .unwrap();

        let workspace = TempDir::new().unwrap();
        write_workspace_config(
            workspace.path(),
            r#"
[bundles.node.article]
status = 1
pattern = "Workspace"
"#,
        );

        let config = ConfigLoader::load(workspace.path()).unwrap();
        let article = &config.bundles.0["node"]["article"];
        assert_eq!(article.status, TitleStatus::Enabled);
        assert_eq!(article.pattern, "Workspace");
        assert_eq!(config.bundles.0["node"]["blog"].status, TitleStatus::Enabled);
        assert_eq!(
            ConfigLoader::xdg_config_path().unwrap(),
            global_dir.join("config.toml")
        );
    });
}

#[test]
fn test_invalid_logging_values_reported() {
    let config = ConfigLoader::from_toml_str(
        r#"
[logging]
format = "xml"
"#,
    )
    .unwrap();
    let errors = config.validate().unwrap_err();
    assert!(matches!(&errors[0], ValidationError::Engine(msg) if msg.contains("xml")));
}
