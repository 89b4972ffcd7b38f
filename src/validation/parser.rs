//! Parsing of `cfn-lint --format json` output.

use serde::Deserialize;

use super::types::{codes, Severity, ValidationIssue};

/// Longest stdout/stderr excerpt quoted in an issue message.
pub const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LintMatch {
    #[serde(rename = "Rule")]
    rule: LintRule,
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "Location")]
    location: LintLocation,
    #[serde(rename = "Level")]
    level: Option<String>,
    #[serde(rename = "Filename")]
    filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LintRule {
    #[serde(rename = "Id")]
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LintLocation {
    #[serde(rename = "Start")]
    start: LintPosition,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LintPosition {
    #[serde(rename = "LineNumber")]
    line_number: Option<u64>,
    #[serde(rename = "ColumnNumber")]
    column_number: Option<u64>,
}

impl From<LintMatch> for ValidationIssue {
    fn from(m: LintMatch) -> Self {
        let severity = Severity::from_level(m.level.as_deref().unwrap_or("error"));
        ValidationIssue::new(
            m.rule.id.unwrap_or_else(|| "Unknown".to_string()),
            severity,
            m.message.unwrap_or_else(|| "Unknown error".to_string()),
        )
        .with_location(m.location.start.line_number, m.location.start.column_number)
        .with_filename(m.filename)
    }
}

/// Turn a finished cfn-lint run into issues.
///
/// Non-empty stdout must be a JSON array of matches; anything else yields a
/// single `JSON_PARSE_ERROR`. A non-zero exit with empty stdout and some
/// stderr yields `CFN_LINT_ERROR`.
pub fn parse_lint_output(stdout: &str, stderr: &str, success: bool) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !stdout.trim().is_empty() {
        match serde_json::from_str::<Vec<LintMatch>>(stdout) {
            Ok(matches) => issues.extend(matches.into_iter().map(ValidationIssue::from)),
            Err(e) => {
                tracing::warn!("Failed to parse cfn-lint JSON output: {}", e);
                issues.push(ValidationIssue::error(
                    codes::JSON_PARSE_ERROR,
                    format!("Failed to parse cfn-lint output: {}", excerpt(stdout)),
                ));
            }
        }
    }

    if !success && stdout.is_empty() && !stderr.is_empty() {
        tracing::warn!("cfn-lint execution failed: {}", stderr.trim());
        issues.push(ValidationIssue::error(
            codes::CFN_LINT_ERROR,
            format!("cfn-lint execution failed: {}", excerpt(stderr)),
        ));
    }

    issues
}

/// First [`EXCERPT_CHARS`] characters, with `...` when cut.
pub fn excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_CHARS {
        let head: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
