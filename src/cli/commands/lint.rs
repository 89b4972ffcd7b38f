//! Lint command implementation.
//!
//! The `cfn-linter lint` command discovers templates, validates each one with
//! cfn-lint and prints a report.

use std::path::{Path, PathBuf};

use crate::cli::args::LintArgs;
use crate::config::{load_config, LinterConfig};
use crate::discovery::TemplateDiscovery;
use crate::environment::EnvironmentManager;
use crate::error::Result;
use crate::report::{
    format_validation_summary, HumanFormatter, JsonFormatter, ReportFormat, ReportFormatter,
    SarifFormatter,
};
use crate::ui::{SpinnerHandle, UserInterface};
use crate::validation::{CfnValidator, ValidationSummary};
use crate::venv::LinterLocator;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The lint command implementation.
pub struct LintCommand {
    project_root: PathBuf,
    args: LintArgs,
}

impl LintCommand {
    /// Create a new lint command.
    pub fn new(project_root: &Path, args: LintArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &LintArgs {
        &self.args
    }

    /// Config file values with command-line overrides applied.
    fn effective_config(&self, mut config: LinterConfig) -> LinterConfig {
        if let Some(dir) = &self.args.templates_dir {
            config.templates_dir = Some(dir.clone());
        }
        config
    }

    fn environment(&self, config: &LinterConfig) -> EnvironmentManager {
        let mut env = EnvironmentManager::with_config(&self.project_root, config);
        let validation = &mut env.config_mut().validation;
        if self.args.fail_on_warnings {
            validation.fail_on_warnings = true;
        }
        if self.args.no_venv {
            validation.use_venv = false;
        }
        if let Some(timeout) = self.args.timeout {
            validation.timeout_seconds = timeout;
        }
        env
    }

    /// Resolve cfn-lint once, installing it into the venv when needed.
    fn prepare_validator(
        &self,
        env: &EnvironmentManager,
        config: &LinterConfig,
        ui: &mut dyn UserInterface,
    ) -> Option<CfnValidator> {
        let validator = CfnValidator::from_environment(env, config, self.args.cfn_lint.clone());
        tracing::debug!("Using cfn-lint from {}", validator.locator().describe());

        let mut spinner = self.spinner(ui, "Preparing cfn-lint");
        match validator.locator().resolve() {
            Ok(path) => {
                spinner.finish_and_clear();
                Some(CfnValidator::new(
                    &self.project_root,
                    LinterLocator::Explicit(path),
                    validator.timeout_seconds(),
                ))
            }
            Err(e) => {
                spinner.finish_and_clear();
                tracing::error!("Failed to set up cfn-lint: {}", e);
                ui.error(&format!("Failed to set up cfn-lint environment: {}", e));
                None
            }
        }
    }

    fn is_text_format(&self) -> bool {
        matches!(self.args.format, ReportFormat::Human | ReportFormat::Full)
    }

    fn spinner(&self, ui: &mut dyn UserInterface, message: &str) -> Box<dyn SpinnerHandle> {
        if self.is_text_format() {
            ui.start_spinner(message)
        } else {
            Box::new(crate::ui::ProgressSpinner::hidden())
        }
    }

    fn render(&self, summary: &ValidationSummary, verbose: bool) -> String {
        let mut output = Vec::new();

        let written = match self.args.format {
            ReportFormat::Full => {
                output.extend_from_slice(format_validation_summary(summary).as_bytes());
                Ok(())
            }
            ReportFormat::Json => JsonFormatter::new().format(summary, &mut output),
            ReportFormat::Sarif => SarifFormatter::new(
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                &self.project_root,
            )
            .format(summary, &mut output),
            ReportFormat::Human => HumanFormatter::new(&self.project_root)
                .verbose(verbose)
                .summary_only(self.args.summary_only)
                .format(summary, &mut output),
        };
        if let Err(e) = written {
            tracing::error!("Failed to render report: {}", e);
        }

        String::from_utf8_lossy(&output).trim_end().to_string()
    }
}

impl Command for LintCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !self.project_root.is_dir() {
            ui.error(&format!(
                "Project root does not exist: {}",
                self.project_root.display()
            ));
            return Ok(CommandResult::failure(exit_code::CONFIGURATION));
        }

        let config = match load_config(&self.project_root) {
            Ok(config) => self.effective_config(config),
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        let env = self.environment(&config);
        if !env.ensure_consistent_environment() {
            tracing::warn!("Environment consistency issues detected, validation may fail");
        }

        let verbose = ui.output_mode().is_verbose() || env.should_use_verbose_output();

        let Some(validator) = self.prepare_validator(&env, &config, ui) else {
            return Ok(CommandResult::failure(exit_code::ENVIRONMENT));
        };

        let discovery = TemplateDiscovery::from_config(&self.project_root, &config);
        let templates = match discovery.find_templates(None) {
            Ok(templates) => templates,
            Err(e) => {
                ui.error(&format!("Template discovery failed: {}", e));
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        if templates.is_empty() {
            ui.warning(&format!(
                "No CloudFormation templates found in {}",
                discovery.templates_base_path().display()
            ));
            return Ok(CommandResult::failure(exit_code::NO_TEMPLATES));
        }

        if self.is_text_format() && ui.output_mode().is_verbose() {
            ui.show_header(&format!(
                "Validating {} templates ({} context, {}s timeout)",
                templates.len(),
                env.execution_context(),
                env.validation_timeout()
            ));
        }

        let mut spinner = self.spinner(ui, "Validating templates");
        let summary = validator.validate_all_with_progress(&templates, |index, total, path| {
            let shown = path.strip_prefix(&self.project_root).unwrap_or(path);
            spinner.set_message(&format!("Validating {} ({}/{})", shown.display(), index + 1, total));
        });
        spinner.finish_and_clear();

        ui.report(&self.render(&summary, verbose));

        let fail_on_warnings = env.should_fail_on_warnings();
        let failed = summary.has_failures() || (fail_on_warnings && summary.total_warnings > 0);

        if self.is_text_format() {
            if summary.has_failures() {
                ui.error(&format!("{} template(s) failed validation", summary.failed_templates));
            } else if failed {
                ui.error(&format!(
                    "{} warning(s) reported and warnings are treated as failures",
                    summary.total_warnings
                ));
            } else {
                ui.success(&format!("All {} templates passed validation", summary.total_templates));
            }
            if failed && env.config().validation.fail_fast {
                ui.message("Fail-fast is enabled for this environment; the build should stop here.");
            }
        }

        Ok(CommandResult::from_success(!failed))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    const FAKE_LINT: &str = r#"#!/bin/sh
case "$3" in
  *broken*)
    echo '[{"Rule":{"Id":"E3012"},"Message":"Property should be of type String","Location":{"Start":{"LineNumber":12,"ColumnNumber":7}},"Level":"Error","Filename":"'"$3"'"}]'
    exit 2 ;;
  *noisy*)
    echo '[{"Rule":{"Id":"W2001"},"Message":"Parameter Env not used","Location":{"Start":{"LineNumber":3,"ColumnNumber":3}},"Level":"Warning"}]'
    exit 4 ;;
  *)
    echo '[]' ;;
esac
"#;

    fn project(templates: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("templates/v2");
        fs::create_dir_all(&base).unwrap();
        for name in templates {
            fs::write(base.join(name), "AWSTemplateFormatVersion: '2010-09-09'\nResources: {}\n").unwrap();
        }

        let lint = temp.path().join("fake-cfn-lint");
        fs::write(&lint, FAKE_LINT).unwrap();
        fs::set_permissions(&lint, fs::Permissions::from_mode(0o755)).unwrap();
        temp
    }

    fn args(temp: &TempDir) -> LintArgs {
        LintArgs {
            cfn_lint: Some(temp.path().join("fake-cfn-lint")),
            ..Default::default()
        }
    }

    #[test]
    fn missing_project_root_exits_4() {
        let temp = TempDir::new().unwrap();
        let cmd = LintCommand::new(&temp.path().join("missing"), LintArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 4);
        assert!(ui.has_error("Project root does not exist"));
    }

    #[test]
    fn no_templates_exits_2() {
        let temp = project(&[]);
        let cmd = LintCommand::new(temp.path(), args(&temp));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_warning("No CloudFormation templates found"));
    }

    #[test]
    fn unusable_linter_exits_3() {
        let temp = project(&["app.yml"]);
        let cmd = LintCommand::new(
            temp.path(),
            LintArgs {
                cfn_lint: Some(temp.path().join("not-there")),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(ui.has_error("Failed to set up cfn-lint environment"));
    }

    #[test]
    fn clean_templates_pass() {
        let temp = project(&["app.yml", "storage.yaml"]);
        let cmd = LintCommand::new(temp.path(), args(&temp));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success, "{:?}", ui.errors());
        assert!(ui.has_report("Total templates:   2"));
        assert!(ui.has_success("All 2 templates passed validation"));
    }

    #[test]
    fn failing_template_exits_1() {
        let temp = project(&["app.yml", "broken.yml"]);
        let cmd = LintCommand::new(temp.path(), args(&temp));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_report("ERROR [E3012]: Property should be of type String (line 12, col 7)"));
        assert!(ui.has_error("1 template(s) failed validation"));
    }

    #[test]
    fn warnings_fail_only_when_requested() {
        let temp = project(&["noisy.yml"]);

        let mut ui = MockUI::new();
        let lenient = LintCommand::new(temp.path(), args(&temp)).execute(&mut ui).unwrap();
        assert!(lenient.success);

        let strict_args = LintArgs {
            fail_on_warnings: true,
            ..args(&temp)
        };
        let mut ui = MockUI::new();
        let strict = LintCommand::new(temp.path(), strict_args).execute(&mut ui).unwrap();
        assert_eq!(strict.exit_code, 1);
        assert!(ui.has_error("warnings are treated as failures"));
    }

    #[test]
    fn json_report_is_parseable() {
        let temp = project(&["broken.yml"]);
        let cmd = LintCommand::new(
            temp.path(),
            LintArgs {
                format: ReportFormat::Json,
                ..args(&temp)
            },
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.output()).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["summary"]["failed_templates"], 1);
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn full_report_includes_recommendations() {
        let temp = project(&["broken.yml"]);
        let cmd = LintCommand::new(
            temp.path(),
            LintArgs {
                format: ReportFormat::Full,
                ..args(&temp)
            },
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_report("Error Summary by Type"));
        assert!(ui.has_report("Recommendations"));
    }

    #[test]
    fn templates_dir_override() {
        let temp = project(&[]);
        let other = temp.path().join("cfn");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("queue-template.yml"), "Resources: {}\n").unwrap();

        let cmd = LintCommand::new(
            temp.path(),
            LintArgs {
                templates_dir: Some("cfn".to_string()),
                ..args(&temp)
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_report("Total templates:   1"));
    }

    #[test]
    fn verbose_mode_announces_run() {
        let temp = project(&["app.yml"]);
        let cmd = LintCommand::new(temp.path(), args(&temp));

        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        cmd.execute(&mut ui).unwrap();
        assert!(ui.headers().iter().any(|h| h.starts_with("Validating 1 templates")));

        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(ui.headers().is_empty());
    }
}
