//! Validation settings derived from the execution context.

use serde::Serialize;

use super::detection::ExecutionContext;
use crate::config::LinterConfig;

/// Knobs that control a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSettings {
    /// Per-template linter timeout.
    pub timeout_seconds: u64,
    /// Treat warnings as failures.
    pub fail_on_warnings: bool,
    /// Print progress and detail while running.
    pub verbose_output: bool,
    /// Run the linter from the project's virtual environment.
    pub use_venv: bool,
    /// Reserved; templates are always validated sequentially.
    pub parallel_execution: bool,
    /// Set for CI runs. Reported only; every template is still validated.
    pub fail_fast: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            fail_on_warnings: false,
            verbose_output: false,
            use_venv: true,
            parallel_execution: false,
            fail_fast: false,
        }
    }
}

impl ValidationSettings {
    /// Defaults for a detected context.
    ///
    /// Build pipelines get longer timeouts, tests shorter ones, and CI is
    /// always verbose.
    pub fn for_context(context: ExecutionContext, is_ci: bool) -> Self {
        let mut settings = Self::default();

        match context {
            ExecutionContext::BuildPipeline => {
                settings.timeout_seconds = 120;
                settings.verbose_output = true;
            }
            ExecutionContext::Test => {
                settings.timeout_seconds = 30;
                settings.verbose_output = false;
            }
            ExecutionContext::Local => {
                settings.timeout_seconds = 60;
                settings.verbose_output = true;
            }
            ExecutionContext::Unknown => {}
        }

        if is_ci {
            settings.verbose_output = true;
            settings.fail_fast = true;
        }

        settings
    }

    /// Apply values set in the project config file.
    pub fn apply_config(&mut self, config: &LinterConfig) {
        if let Some(timeout) = config.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(fail) = config.fail_on_warnings {
            self.fail_on_warnings = fail;
        }
        if let Some(verbose) = config.verbose_output {
            self.verbose_output = verbose;
        }
        if let Some(use_venv) = config.use_venv {
            self.use_venv = use_venv;
        }
    }

    /// Settings as ordered key/value pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timeout_seconds", self.timeout_seconds.to_string()),
            ("fail_on_warnings", self.fail_on_warnings.to_string()),
            ("verbose_output", self.verbose_output.to_string()),
            ("use_venv", self.use_venv.to_string()),
            ("parallel_execution", self.parallel_execution.to_string()),
            ("fail_fast", self.fail_fast.to_string()),
        ]
    }
}
