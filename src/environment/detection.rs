//! Execution context detection.
//!
//! Decides whether cfn-linter is running on a developer machine, inside a
//! build pipeline, or under a test harness by checking well-known
//! environment variables and the name of the invoking program.

use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::settings::ValidationSettings;
use crate::shell::{execute_check, find_in_path};

/// Environment variables set by test harnesses.
const TEST_VARS: &[&str] = &[
    "PYTEST_CURRENT_TEST",
    "_PYTEST_RAISE",
    "PYTEST_VERSION",
    "NEXTEST_RUN_ID",
    "CFN_LINTER_TEST_CONTEXT",
];

/// Environment variables set by CI/CD systems.
const CI_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "BUILD_ID",
    "BUILD_NUMBER",
    "CODEBUILD_BUILD_ID",
    "CODEBUILD_BUILD_ARN",
    "JENKINS_URL",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "TEAMCITY_VERSION",
];

/// Program names that are only ever invoked from build scripts.
const BUILD_PROGRAMS: &[&str] = &["cfn_lint_runner", "build", "pipeline"];

/// Variables captured into [`EnvironmentConfig::environment_variables`].
const CAPTURED_VARS: &[&str] = &[
    "PATH",
    "PYTHONPATH",
    "VIRTUAL_ENV",
    "CI",
    "BUILD_ID",
    "CODEBUILD_BUILD_ID",
    "PYTEST_CURRENT_TEST",
];

/// Where the linter is being run from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    /// A developer workstation.
    Local,
    /// A CI/CD build (CodeBuild, GitHub Actions, ...).
    BuildPipeline,
    /// A test harness.
    Test,
    /// Nothing could be determined.
    Unknown,
}

impl ExecutionContext {
    /// Stable string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::BuildPipeline => "build_pipeline",
            Self::Test => "test",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved description of the current environment.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentConfig {
    pub context: ExecutionContext,
    pub project_root: PathBuf,
    pub venv_path: PathBuf,
    pub is_ci: bool,
    pub python_executable: Option<PathBuf>,
    pub environment_variables: BTreeMap<String, String>,
    pub validation: ValidationSettings,
}

/// Detects the execution context and environment configuration.
///
/// # Example
///
/// ```
/// use cfn_linter::environment::{EnvironmentDetector, ExecutionContext};
///
/// let detector = EnvironmentDetector::new("/repo").with_program_name("cfn-linter");
/// let context = detector.detect_with_env(|key| match key {
///     "CODEBUILD_BUILD_ID" => Ok("build:1".to_string()),
///     _ => Err(std::env::VarError::NotPresent),
/// });
/// assert_eq!(context, ExecutionContext::BuildPipeline);
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentDetector {
    project_root: PathBuf,
    program_name: Option<String>,
}

impl EnvironmentDetector {
    /// Create a detector for the given project root.
    ///
    /// The invoking program name is taken from the process arguments.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let program_name = std::env::args_os().next().and_then(|arg0| {
            Path::new(&arg0)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        });

        Self {
            project_root: project_root.into(),
            program_name,
        }
    }

    /// Override the invoking program name (for testing).
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Get the project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Path of the project's virtual environment.
    pub fn venv_path(&self) -> PathBuf {
        self.project_root.join(".venv")
    }

    /// Detect the current execution context from the process environment.
    pub fn detect_execution_context(&self) -> ExecutionContext {
        self.detect_with_env(|key| std::env::var(key))
    }

    /// Detect with a custom env var lookup (for testing).
    ///
    /// Checked in order: test harness, build pipeline, local.
    pub fn detect_with_env<F>(&self, env_fn: F) -> ExecutionContext
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        if self.is_test_context(&env_fn) {
            ExecutionContext::Test
        } else if self.is_build_pipeline(&env_fn) {
            ExecutionContext::BuildPipeline
        } else {
            ExecutionContext::Local
        }
    }

    /// Check if running in any CI/CD environment.
    pub fn is_ci_environment(&self) -> bool {
        self.is_build_pipeline(&|key: &str| std::env::var(key))
    }

    fn is_test_context<F>(&self, env_fn: &F) -> bool
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        TEST_VARS.iter().any(|var| env_fn(var).is_ok())
    }

    fn is_build_pipeline<F>(&self, env_fn: &F) -> bool
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        if CI_VARS.iter().any(|var| env_fn(var).is_ok()) {
            return true;
        }

        if env_fn("CODEBUILD_SRC_DIR").is_ok_and(|dir| !dir.is_empty()) {
            return true;
        }

        self.program_name
            .as_deref()
            .is_some_and(|name| BUILD_PROGRAMS.contains(&name))
    }

    /// Build the complete environment configuration.
    pub fn environment_config(&self) -> EnvironmentConfig {
        self.environment_config_with_env(|key| std::env::var(key))
    }

    /// Build the environment configuration with a custom env var lookup.
    pub fn environment_config_with_env<F>(&self, env_fn: F) -> EnvironmentConfig
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let context = self.detect_with_env(&env_fn);
        let is_ci = self.is_build_pipeline(&env_fn);

        let environment_variables = CAPTURED_VARS
            .iter()
            .filter_map(|var| env_fn(var).ok().map(|value| (var.to_string(), value)))
            .collect();

        EnvironmentConfig {
            context,
            project_root: self.project_root.clone(),
            venv_path: self.venv_path(),
            is_ci,
            python_executable: system_python(),
            environment_variables,
            validation: ValidationSettings::for_context(context, is_ci),
        }
    }

    /// Verify that the environment is set up consistently.
    ///
    /// Returns whether everything checked out, plus a description of each
    /// problem found.
    pub fn verify_environment_consistency(&self) -> (bool, Vec<String>) {
        let mut issues = Vec::new();

        if !self.project_root.exists() {
            issues.push(format!(
                "Project root does not exist: {}",
                self.project_root.display()
            ));
        }

        let venv_path = self.venv_path();
        if !venv_path.exists() {
            issues.push(format!(
                "Virtual environment does not exist: {}",
                venv_path.display()
            ));
        } else {
            let python = crate::venv::venv_python(&venv_path);
            if !python.exists() {
                issues.push(format!(
                    "Python executable not found in virtual environment: {}",
                    python.display()
                ));
            }
        }

        match system_python() {
            Some(python) => {
                if !execute_check(&python, &["--version"], Some(10)) {
                    issues.push("Cannot determine Python version".to_string());
                }
            }
            None => issues.push("No Python interpreter found on PATH".to_string()),
        }

        (issues.is_empty(), issues)
    }

    /// Human-readable summary of the environment.
    pub fn environment_summary(&self) -> String {
        let config = self.environment_config();
        let (is_consistent, issues) = self.verify_environment_consistency();
        format_environment_summary(&config, is_consistent, &issues)
    }
}

/// Render an environment summary block.
pub fn format_environment_summary(
    config: &EnvironmentConfig,
    is_consistent: bool,
    issues: &[String],
) -> String {
    let mut lines = vec![
        "Environment Configuration Summary".to_string(),
        "=".repeat(40),
        format!("Execution Context: {}", config.context),
        format!("Project Root: {}", config.project_root.display()),
        format!("Virtual Environment: {}", config.venv_path.display()),
        format!("CI Environment: {}", config.is_ci),
        format!(
            "Python Executable: {}",
            config
                .python_executable
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "not found".to_string())
        ),
        String::new(),
        "Validation Configuration:".to_string(),
    ];

    for (key, value) in config.validation.entries() {
        lines.push(format!("  {}: {}", key, value));
    }

    lines.push(String::new());
    lines.push("Environment Variables:".to_string());
    for (key, value) in &config.environment_variables {
        lines.push(format!("  {}: {}", key, truncate_value(value, 50)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Environment Consistency: {}",
        if is_consistent { "✓ PASS" } else { "✗ ISSUES" }
    ));

    if !issues.is_empty() {
        lines.push("Issues found:".to_string());
        for issue in issues {
            lines.push(format!("  - {}", issue));
        }
    }

    lines.join("\n")
}

/// Locate a Python interpreter on `PATH`.
pub fn system_python() -> Option<PathBuf> {
    find_in_path("python3").or_else(|| find_in_path("python"))
}

fn truncate_value(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let head: String = value.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}
