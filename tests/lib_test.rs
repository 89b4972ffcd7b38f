//! Library integration tests.

use std::fs;
use std::path::PathBuf;

use cfn_linter::LinterError;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = LinterError::MissingParameter {
        name: "Environment".into(),
    };
    assert!(err.to_string().contains("Environment"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> cfn_linter::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use cfn_linter::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["cfn-linter", "discover", "--by-category"]);

    if let Some(Commands::Discover(args)) = cli.command {
        assert!(args.by_category);
    } else {
        panic!("Expected Discover command");
    }
}

#[test]
fn config_drives_discovery() {
    use cfn_linter::config::load_config;
    use cfn_linter::discovery::TemplateDiscovery;

    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".cfn-linter.yml"),
        "templates_dir: cfn\nexcluded_files: [skip.yml]\n",
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("cfn/app")).unwrap();
    fs::write(temp.path().join("cfn/app/stack.yml"), "Resources: {}\n").unwrap();
    fs::write(temp.path().join("cfn/skip.yml"), "Resources: {}\n").unwrap();

    let config = load_config(temp.path()).unwrap();
    let discovery = TemplateDiscovery::from_config(temp.path(), &config);

    let templates = discovery.find_templates(None).unwrap();
    assert_eq!(templates, vec![temp.path().join("cfn/app/stack.yml")]);
    let categories = discovery.templates_by_category(None).unwrap();
    assert_eq!(categories.keys().collect::<Vec<_>>(), vec!["app"]);
}

#[test]
fn prechecks_fail_without_running_linter() {
    use cfn_linter::validation::{codes, CfnValidator};
    use cfn_linter::venv::LinterLocator;

    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty.yml");
    fs::write(&empty, "").unwrap();
    let validator = CfnValidator::new(
        temp.path(),
        LinterLocator::Explicit(PathBuf::from("/nonexistent/cfn-lint")),
        30,
    );

    let summary = validator.validate_all_templates(&[temp.path().join("missing.yml"), empty]);

    assert_eq!(summary.total_templates, 2);
    assert_eq!(summary.failed_templates, 2);
    assert_eq!(summary.results[0].errors[0].rule_id, codes::FILE_NOT_FOUND);
    assert_eq!(summary.results[1].errors[0].rule_id, codes::EMPTY_FILE);
}

#[test]
fn template_queries_and_compat() {
    use cfn_linter::compat::{CompatChecker, CompatOptions};
    use cfn_linter::template::CfnTemplate;

    let original = CfnTemplate::parse(
        "Parameters:\n  Env:\n    Type: String\nResources:\n  Queue:\n    Type: AWS::SQS::Queue\n",
    )
    .unwrap();
    let updated = CfnTemplate::parse(
        "Parameters:\n  Env:\n    Type: Number\nResources:\n  Queue:\n    Type: AWS::SNS::Topic\n",
    )
    .unwrap();

    assert_eq!(original.find_resources_by_type("AWS::SQS::Queue").len(), 1);

    let report = CompatChecker::new(&original, &updated).run(&CompatOptions::default());
    assert!(!report.is_compatible());
    assert_eq!(report.violations.len(), 2);
}

#[test]
fn environment_settings_follow_config() {
    use cfn_linter::config::LinterConfig;
    use cfn_linter::environment::EnvironmentManager;

    let temp = TempDir::new().unwrap();
    let config = LinterConfig {
        timeout_seconds: Some(7),
        use_venv: Some(false),
        ..Default::default()
    };

    let env = EnvironmentManager::with_config(temp.path(), &config);

    assert_eq!(env.validation_timeout(), 7);
    assert!(!env.is_venv_required());
    assert_eq!(env.venv_path(), temp.path().join(".venv"));
}
