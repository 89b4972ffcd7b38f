//! Project configuration schema.
//!
//! Mirrors the structure of `.cfn-linter.yml`. Every field is optional;
//! unset fields fall back to the defaults for the detected execution context.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default templates directory, relative to the project root.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates/v2";

/// Default requirement installed when no requirements file exists.
pub const DEFAULT_CFN_LINT_REQUIREMENT: &str = "cfn-lint>=0.83.0";

/// Contents of `.cfn-linter.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LinterConfig {
    /// Directory containing CloudFormation templates, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<String>,

    /// Per-template cfn-lint timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,

    /// Treat cfn-lint warnings as failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_warnings: Option<bool>,

    /// Print progress detail during validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_output: Option<bool>,

    /// Run cfn-lint from the project's `.venv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_venv: Option<bool>,

    /// Explicit cfn-lint executable; bypasses the virtual environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfn_lint_path: Option<String>,

    /// Requirements file installed into the venv, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_file: Option<String>,

    /// pip requirement used when the requirements file is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfn_lint_requirement: Option<String>,

    /// Additional file names never treated as templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_files: Vec<String>,
}

impl LinterConfig {
    /// Templates directory, falling back to the default.
    pub fn templates_dir(&self) -> &str {
        self.templates_dir.as_deref().unwrap_or(DEFAULT_TEMPLATES_DIR)
    }

    /// cfn-lint requirement, falling back to the default.
    pub fn cfn_lint_requirement(&self) -> &str {
        self.cfn_lint_requirement
            .as_deref()
            .unwrap_or(DEFAULT_CFN_LINT_REQUIREMENT)
    }
}

/// JSON Schema for `.cfn-linter.yml`.
pub fn config_json_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(LinterConfig)).unwrap_or_default()
}
