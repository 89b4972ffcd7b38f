//! Runs cfn-lint against templates.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::parser::parse_lint_output;
use super::types::{codes, ValidationResult, ValidationSummary};
use crate::config::LinterConfig;
use crate::environment::EnvironmentManager;
use crate::error::LinterError;
use crate::shell::{execute, CommandOptions};
use crate::venv::{LinterLocator, VirtualEnvManager};

/// Bytes inspected by the readability pre-check.
const PROBE_BYTES: usize = 1024;

/// Validates templates one at a time with an external cfn-lint.
#[derive(Debug, Clone)]
pub struct CfnValidator {
    project_root: PathBuf,
    locator: LinterLocator,
    timeout_seconds: u64,
}

impl CfnValidator {
    pub fn new(project_root: impl Into<PathBuf>, locator: LinterLocator, timeout_seconds: u64) -> Self {
        Self {
            project_root: project_root.into(),
            locator,
            timeout_seconds,
        }
    }

    /// Build a validator from the resolved environment.
    ///
    /// `explicit` (from the command line) takes precedence over the config's
    /// `cfn_lint_path`.
    pub fn from_environment(
        env: &EnvironmentManager,
        config: &LinterConfig,
        explicit: Option<PathBuf>,
    ) -> Self {
        let root = env.detector().project_root().to_path_buf();
        let explicit = explicit.or_else(|| config.cfn_lint_path.as_ref().map(|p| root.join(p)));
        let locator = LinterLocator::choose(
            explicit,
            env.is_venv_required(),
            VirtualEnvManager::from_config(&root, config),
        );
        Self::new(root, locator, env.validation_timeout())
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn locator(&self) -> &LinterLocator {
        &self.locator
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Validate a single template.
    ///
    /// Never fails: every problem, including ones with the file or the
    /// linter itself, is reported as an error issue on the result.
    pub fn validate_template(&self, template_path: &Path) -> ValidationResult {
        let start = Instant::now();

        if let Some((rule_id, message)) = precheck(template_path) {
            tracing::warn!("{}", message);
            return ValidationResult::failed(template_path, rule_id, message, start.elapsed());
        }

        let cfn_lint = match self.locator.resolve() {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Failed to get cfn-lint path: {}", e);
                return ValidationResult::failed(
                    template_path,
                    codes::CFN_LINT_SETUP_ERROR,
                    format!("Failed to set up cfn-lint: {}", e),
                    start.elapsed(),
                );
            }
        };

        let options = CommandOptions {
            cwd: Some(self.project_root.clone()),
            timeout: Some(self.timeout_seconds),
            ..Default::default()
        };
        let args = [OsStr::new("--format"), OsStr::new("json"), template_path.as_os_str()];

        match execute(&cfn_lint, &args, &options) {
            Ok(output) => {
                let issues = parse_lint_output(&output.stdout, &output.stderr, output.success);
                ValidationResult::from_issues(template_path, issues, start.elapsed())
            }
            Err(e) => {
                let (rule_id, message) = match &e {
                    LinterError::Io(io) if io.kind() == ErrorKind::NotFound => (
                        codes::CFN_LINT_NOT_FOUND,
                        format!("cfn-lint executable not found at: {}", cfn_lint.display()),
                    ),
                    LinterError::Io(io) if io.kind() == ErrorKind::PermissionDenied => (
                        codes::CFN_LINT_PERMISSION_ERROR,
                        format!("Permission denied executing cfn-lint: {}", cfn_lint.display()),
                    ),
                    LinterError::CommandTimeout { seconds, .. } => (
                        codes::TIMEOUT_ERROR,
                        format!("cfn-lint execution timed out after {} seconds", seconds),
                    ),
                    other => (
                        codes::EXECUTION_ERROR,
                        format!("Validation execution failed: {}", other),
                    ),
                };
                tracing::warn!("{}: {}", template_path.display(), message);
                ValidationResult::failed(template_path, rule_id, message, start.elapsed())
            }
        }
    }

    /// Validate templates sequentially.
    pub fn validate_all_templates(&self, template_paths: &[PathBuf]) -> ValidationSummary {
        self.validate_all_with_progress(template_paths, |_, _, _| {})
    }

    /// Validate templates sequentially, calling `progress(index, total, path)`
    /// before each one.
    pub fn validate_all_with_progress<F>(&self, template_paths: &[PathBuf], mut progress: F) -> ValidationSummary
    where
        F: FnMut(usize, usize, &Path),
    {
        let start = Instant::now();

        if template_paths.is_empty() {
            tracing::info!("No templates provided for validation");
            return ValidationSummary::from_results(Vec::new(), start.elapsed());
        }

        let total = template_paths.len();
        tracing::info!("Starting validation of {} templates", total);

        let mut results = Vec::with_capacity(total);
        for (i, path) in template_paths.iter().enumerate() {
            progress(i, total, path);
            tracing::debug!("Validating template {}/{}: {}", i + 1, total, path.display());

            let result = self.validate_template(path);
            if result.is_valid {
                tracing::debug!("Template validation successful: {}", path.display());
            } else {
                tracing::debug!(
                    "Template validation failed: {} - {} errors",
                    path.display(),
                    result.errors.len()
                );
            }
            results.push(result);
        }

        let summary = ValidationSummary::from_results(results, start.elapsed());
        tracing::info!(
            "Validation completed: {} valid, {} failed, {} total errors, {} total warnings, execution time: {:.2}s",
            summary.valid_templates,
            summary.failed_templates,
            summary.total_errors,
            summary.total_warnings,
            summary.execution_time.as_secs_f64()
        );
        summary
    }
}

/// File checks run before invoking the linter.
fn precheck(path: &Path) -> Option<(&'static str, String)> {
    if !path.exists() {
        return Some((
            codes::FILE_NOT_FOUND,
            format!("Template file does not exist: {}", path.display()),
        ));
    }

    if !path.is_file() {
        return Some((codes::NOT_A_FILE, format!("Path is not a file: {}", path.display())));
    }

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Some((
                codes::PERMISSION_DENIED,
                format!("Cannot read template file (permission denied): {}", path.display()),
            ));
        }
        Err(e) => {
            return Some((
                codes::FILESYSTEM_ERROR,
                format!("File system error accessing template: {}", e),
            ));
        }
    };

    match file.metadata() {
        Ok(meta) if meta.len() == 0 => {
            return Some((
                codes::EMPTY_FILE,
                format!("Template file is empty: {}", path.display()),
            ));
        }
        Ok(_) => {}
        Err(e) => {
            return Some((
                codes::FILESYSTEM_ERROR,
                format!("File system error accessing template: {}", e),
            ));
        }
    }

    let mut buf = Vec::with_capacity(PROBE_BYTES);
    if let Err(e) = file.by_ref().take(PROBE_BYTES as u64).read_to_end(&mut buf) {
        return Some((codes::FILE_READ_ERROR, format!("Cannot read template file: {}", e)));
    }

    let head = match std::str::from_utf8(&buf) {
        Ok(text) => text,
        // A multi-byte character cut by the probe boundary is not an error.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&buf[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => "",
        },
        Err(e) => {
            return Some((
                codes::ENCODING_ERROR,
                format!("Template file has encoding issues: {}", e),
            ));
        }
    };

    if head.trim().is_empty() {
        return Some((
            codes::EMPTY_CONTENT,
            format!(
                "Template file appears to be empty or whitespace only: {}",
                path.display()
            ),
        ));
    }

    None
}
