//! Resolved environment shared by the linter components.

use std::path::{Path, PathBuf};

use super::detection::{EnvironmentConfig, EnvironmentDetector, ExecutionContext};
use crate::config::LinterConfig;

/// Owns the detector and the resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct EnvironmentManager {
    detector: EnvironmentDetector,
    config: EnvironmentConfig,
}

impl EnvironmentManager {
    /// Detect the environment for a project root using context defaults.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::from_detector(EnvironmentDetector::new(project_root), None)
    }

    /// Detect the environment and layer the project config on top.
    pub fn with_config(project_root: impl Into<PathBuf>, linter_config: &LinterConfig) -> Self {
        Self::from_detector(EnvironmentDetector::new(project_root), Some(linter_config))
    }

    /// Build from an existing detector.
    pub fn from_detector(detector: EnvironmentDetector, linter_config: Option<&LinterConfig>) -> Self {
        let mut config = detector.environment_config();
        if let Some(linter_config) = linter_config {
            config.validation.apply_config(linter_config);
        }
        Self { detector, config }
    }

    /// Build from an explicit configuration (for testing).
    pub fn from_parts(detector: EnvironmentDetector, config: EnvironmentConfig) -> Self {
        Self { detector, config }
    }

    /// The underlying detector.
    pub fn detector(&self) -> &EnvironmentDetector {
        &self.detector
    }

    /// The resolved configuration.
    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Mutable access to the resolved configuration, for CLI overrides.
    pub fn config_mut(&mut self) -> &mut EnvironmentConfig {
        &mut self.config
    }

    /// Check consistency, logging each issue found.
    pub fn ensure_consistent_environment(&self) -> bool {
        let (is_consistent, issues) = self.detector.verify_environment_consistency();

        if !is_consistent {
            tracing::warn!("Environment consistency issues detected:");
            for issue in &issues {
                tracing::warn!("  - {}", issue);
            }
        }

        is_consistent
    }

    pub fn validation_timeout(&self) -> u64 {
        self.config.validation.timeout_seconds
    }

    pub fn should_fail_on_warnings(&self) -> bool {
        self.config.validation.fail_on_warnings
    }

    pub fn should_use_verbose_output(&self) -> bool {
        self.config.validation.verbose_output
    }

    pub fn venv_path(&self) -> &Path {
        &self.config.venv_path
    }

    pub fn is_venv_required(&self) -> bool {
        self.config.validation.use_venv
    }

    pub fn execution_context(&self) -> ExecutionContext {
        self.config.context
    }

    pub fn is_ci_environment(&self) -> bool {
        self.config.is_ci
    }
}
