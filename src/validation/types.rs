//! Validation result types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};

/// Rule ids for problems detected by the linter wrapper itself rather than cfn-lint.
pub mod codes {
    pub const FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
    pub const NOT_A_FILE: &str = "NOT_A_FILE";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const EMPTY_FILE: &str = "EMPTY_FILE";
    pub const EMPTY_CONTENT: &str = "EMPTY_CONTENT";
    pub const ENCODING_ERROR: &str = "ENCODING_ERROR";
    pub const FILE_READ_ERROR: &str = "FILE_READ_ERROR";
    pub const FILESYSTEM_ERROR: &str = "FILESYSTEM_ERROR";
    pub const CFN_LINT_SETUP_ERROR: &str = "CFN_LINT_SETUP_ERROR";
    pub const CFN_LINT_NOT_FOUND: &str = "CFN_LINT_NOT_FOUND";
    pub const CFN_LINT_PERMISSION_ERROR: &str = "CFN_LINT_PERMISSION_ERROR";
    pub const TIMEOUT_ERROR: &str = "TIMEOUT_ERROR";
    pub const EXECUTION_ERROR: &str = "EXECUTION_ERROR";
    pub const JSON_PARSE_ERROR: &str = "JSON_PARSE_ERROR";
    pub const CFN_LINT_ERROR: &str = "CFN_LINT_ERROR";
}

/// Severity of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Informational,
}

impl Severity {
    /// Map a cfn-lint `Level` onto a severity.
    ///
    /// Anything that is not a warning or informational counts as an error.
    pub fn from_level(level: &str) -> Self {
        match level.to_lowercase().as_str() {
            "warning" => Self::Warning,
            "informational" => Self::Informational,
            _ => Self::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Informational => "informational",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem reported for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub rule_id: String,
    pub message: String,
    pub line_number: Option<u64>,
    pub column_number: Option<u64>,
    pub severity: Severity,
    pub filename: Option<String>,
}

impl ValidationIssue {
    /// Create an issue without a location.
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            line_number: None,
            column_number: None,
            severity,
            filename: None,
        }
    }

    /// Shorthand for an error-severity issue.
    pub fn error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Error, message)
    }

    pub fn with_location(mut self, line: Option<u64>, column: Option<u64>) -> Self {
        self.line_number = line;
        self.column_number = column;
        self
    }

    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    /// ` (line L, col C)` suffix, empty without a line number.
    pub fn location_suffix(&self) -> String {
        match (self.line_number.filter(|l| *l > 0), self.column_number.filter(|c| *c > 0)) {
            (Some(line), Some(col)) => format!(" (line {}, col {})", line, col),
            (Some(line), None) => format!(" (line {})", line),
            _ => String::new(),
        }
    }
}

/// Outcome of validating one template.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub template_path: PathBuf,
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub informational: Vec<ValidationIssue>,
    #[serde(serialize_with = "serialize_secs")]
    pub execution_time: Duration,
}

impl ValidationResult {
    /// Build a result from parsed issues; valid when there are no errors.
    pub fn from_issues(
        template_path: impl Into<PathBuf>,
        issues: Vec<ValidationIssue>,
        execution_time: Duration,
    ) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut informational = Vec::new();

        for issue in issues {
            match issue.severity {
                Severity::Error => errors.push(issue),
                Severity::Warning => warnings.push(issue),
                Severity::Informational => informational.push(issue),
            }
        }

        Self {
            template_path: template_path.into(),
            is_valid: errors.is_empty(),
            errors,
            warnings,
            informational,
            execution_time,
        }
    }

    /// A failed result carrying a single error.
    pub fn failed(
        template_path: impl Into<PathBuf>,
        rule_id: &str,
        message: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self::from_issues(
            template_path,
            vec![ValidationIssue::error(rule_id, message)],
            execution_time,
        )
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The template path relative to `root` when it lies below it.
    pub fn display_path(&self, root: &Path) -> String {
        self.template_path
            .strip_prefix(root)
            .unwrap_or(&self.template_path)
            .display()
            .to_string()
    }
}

/// Aggregate of a validation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub total_templates: usize,
    pub valid_templates: usize,
    pub failed_templates: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub results: Vec<ValidationResult>,
    #[serde(serialize_with = "serialize_secs")]
    pub execution_time: Duration,
}

impl ValidationSummary {
    /// Tally per-template results.
    pub fn from_results(results: Vec<ValidationResult>, execution_time: Duration) -> Self {
        let valid_templates = results.iter().filter(|r| r.is_valid).count();
        Self {
            total_templates: results.len(),
            valid_templates,
            failed_templates: results.len() - valid_templates,
            total_errors: results.iter().map(|r| r.errors.len()).sum(),
            total_warnings: results.iter().map(|r| r.warnings.len()).sum(),
            results,
            execution_time,
        }
    }

    /// Percentage of templates that passed, 0 for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total_templates == 0 {
            0.0
        } else {
            self.valid_templates as f64 / self.total_templates as f64 * 100.0
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed_templates > 0
    }

    pub fn passed(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_valid)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.is_valid)
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
