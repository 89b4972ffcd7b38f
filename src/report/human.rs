//! Human-readable run report.
//!
//! A fixed-width summary block followed (unless suppressed) by the passing
//! and failing templates with every issue reported for the failures.

use std::io::Write;
use std::path::PathBuf;

use super::ReportFormatter;
use crate::validation::{ValidationIssue, ValidationResult, ValidationSummary};

/// Width of the `=` rules around the summary block.
const RULE_WIDTH: usize = 60;

/// Formats a validation run for the terminal.
pub struct HumanFormatter {
    /// Paths are shown relative to this root when possible.
    pub project_root: PathBuf,
    /// Include the execution time in the summary.
    pub verbose: bool,
    /// Only print the summary block.
    pub summary_only: bool,
}

impl HumanFormatter {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            verbose: false,
            summary_only: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn summary_only(mut self, summary_only: bool) -> Self {
        self.summary_only = summary_only;
        self
    }

    /// The summary block.
    pub fn summary_block(&self, summary: &ValidationSummary) -> String {
        let mut lines = vec![
            "=".repeat(RULE_WIDTH),
            "CloudFormation Template Validation Summary".to_string(),
            "=".repeat(RULE_WIDTH),
            format!("Total templates:   {}", summary.total_templates),
            format!("Valid templates:   {}", summary.valid_templates),
            format!("Failed templates:  {}", summary.failed_templates),
            format!("Total errors:      {}", summary.total_errors),
            format!("Total warnings:    {}", summary.total_warnings),
        ];

        if summary.total_templates > 0 {
            lines.push(format!("Success rate:      {:.1}%", summary.success_rate()));
        }

        if self.verbose {
            lines.push(format!(
                "Execution time:    {:.2}s",
                summary.execution_time.as_secs_f64()
            ));
        }

        lines.push("=".repeat(RULE_WIDTH));
        lines.join("\n")
    }

    /// Per-template detail: passing templates, then failures with their issues.
    pub fn detail_block(&self, summary: &ValidationSummary) -> String {
        let mut lines = Vec::new();

        let passed: Vec<_> = summary.passed().collect();
        if !passed.is_empty() {
            lines.push("\nSuccessfully Validated Templates:".to_string());
            lines.push("-".repeat(40));
            for result in passed {
                lines.push(format!(
                    "  ✓ {}{}",
                    result.display_path(&self.project_root),
                    warning_suffix(result)
                ));
            }
        }

        let failed: Vec<_> = summary.failed().collect();
        if !failed.is_empty() {
            lines.push("\nFailed Templates:".to_string());
            lines.push("-".repeat(40));
            for result in failed {
                lines.push(format!("\n✗ {}", result.display_path(&self.project_root)));
                lines.push(format!(
                    "  Errors: {}, Warnings: {}",
                    result.errors.len(),
                    result.warnings.len()
                ));
                for error in &result.errors {
                    lines.push(issue_line("ERROR", error));
                }
                for warning in &result.warnings {
                    lines.push(issue_line("WARNING", warning));
                }
            }
        }

        lines.join("\n")
    }
}

impl ReportFormatter for HumanFormatter {
    fn format<W: Write>(&self, summary: &ValidationSummary, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "\n{}", self.summary_block(summary))?;

        if !self.summary_only {
            let detail = self.detail_block(summary);
            if !detail.is_empty() {
                writeln!(writer, "{}", detail)?;
            }
        }

        Ok(())
    }
}

/// `    LEVEL [rule]: message (line L, col C)`
pub(crate) fn issue_line(level: &str, issue: &ValidationIssue) -> String {
    format!(
        "    {} [{}]: {}{}",
        level,
        issue.rule_id,
        issue.message,
        issue.location_suffix()
    )
}

pub(crate) fn warning_suffix(result: &ValidationResult) -> String {
    if result.warnings.is_empty() {
        String::new()
    } else {
        format!(" ({} warnings)", result.warnings.len())
    }
}
