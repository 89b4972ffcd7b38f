//! Long-form report with error aggregation and recommendations.

use std::collections::HashMap;

use super::human::{issue_line, warning_suffix};
use crate::validation::ValidationSummary;

const RECOMMENDATIONS: &[&str] = &[
    "Review the error messages above for specific issues to fix",
    "Check CloudFormation template syntax and resource definitions",
    "Ensure all required properties are specified for each resource",
    "Verify resource types are valid and supported by AWS",
    "Consider using AWS CloudFormation documentation for reference",
];

/// Render the full validation report.
pub fn format_validation_summary(summary: &ValidationSummary) -> String {
    let mut lines = vec![
        "CloudFormation Template Validation Summary".to_string(),
        "=".repeat(45),
        format!("Total templates processed: {}", summary.total_templates),
        format!("Valid templates: {}", summary.valid_templates),
        format!("Failed templates: {}", summary.failed_templates),
        format!("Total errors: {}", summary.total_errors),
        format!("Total warnings: {}", summary.total_warnings),
        format!(
            "Execution time: {:.2} seconds",
            summary.execution_time.as_secs_f64()
        ),
    ];

    if summary.total_templates > 0 {
        lines.push(format!("Success rate: {:.1}%", summary.success_rate()));
    }
    lines.push(String::new());

    if summary.total_templates == 0 {
        lines.push("No templates were found or processed.".to_string());
        lines.push(
            "Please check that CloudFormation template files exist in the specified directory."
                .to_string(),
        );
        return lines.join("\n");
    }

    if summary.valid_templates > 0 {
        lines.push(format!(
            "Successfully Validated Templates ({}):",
            summary.valid_templates
        ));
        lines.push("-".repeat(35));
        for result in summary.passed() {
            lines.push(format!(
                "  ✓ {}{}",
                result.template_path.display(),
                warning_suffix(result)
            ));
        }
        lines.push(String::new());
    }

    if summary.failed_templates > 0 {
        lines.push(format!("Failed Templates ({}):", summary.failed_templates));
        lines.push("-".repeat(25));

        // first-seen order breaks frequency ties
        let mut error_types: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for result in summary.failed() {
            lines.push(format!("\n✗ {}", result.template_path.display()));
            lines.push(format!(
                "  Errors: {}, Warnings: {}",
                result.errors.len(),
                result.warnings.len()
            ));

            for error in &result.errors {
                lines.push(issue_line("ERROR", error));
                match index.get(&error.rule_id) {
                    Some(&i) => error_types[i].1 += 1,
                    None => {
                        index.insert(error.rule_id.clone(), error_types.len());
                        error_types.push((error.rule_id.clone(), 1));
                    }
                }
            }
            for warning in &result.warnings {
                lines.push(issue_line("WARNING", warning));
            }
        }

        if !error_types.is_empty() {
            error_types.sort_by(|a, b| b.1.cmp(&a.1));

            lines.push(String::new());
            lines.push("Error Summary by Type:".to_string());
            lines.push("-".repeat(25));
            for (rule_id, count) in error_types {
                let plural = if count == 1 { "" } else { "s" };
                lines.push(format!("  {}: {} occurrence{}", rule_id, count, plural));
            }
        }

        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        lines.push("-".repeat(15));
        for recommendation in RECOMMENDATIONS {
            lines.push(format!("• {}", recommendation));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{codes, ValidationIssue, ValidationResult};
    use std::time::Duration;

    #[test]
    fn empty_run_explains_itself() {
        let report = format_validation_summary(&ValidationSummary::default());

        assert!(report.contains("Total templates processed: 0"));
        assert!(!report.contains("Success rate"));
        assert!(report.ends_with(
            "Please check that CloudFormation template files exist in the specified directory."
        ));
    }

    #[test]
    fn aggregates_error_types_by_frequency() {
        let results = vec![
            ValidationResult::from_issues(
                "a.yml",
                vec![
                    ValidationIssue::error("E1001", "top level"),
                    ValidationIssue::error("E3012", "type"),
                    ValidationIssue::error("E3012", "type again"),
                ],
                Duration::ZERO,
            ),
            ValidationResult::failed("b.yml", codes::EMPTY_FILE, "empty", Duration::ZERO),
            ValidationResult::from_issues("c.yml", vec![], Duration::ZERO),
        ];
        let summary = ValidationSummary::from_results(results, Duration::ZERO);

        let report = format_validation_summary(&summary);

        assert!(report.contains("Successfully Validated Templates (1):"));
        assert!(report.contains("Failed Templates (2):"));
        let e3012 = report.find("  E3012: 2 occurrences").unwrap();
        let e1001 = report.find("  E1001: 1 occurrence\n").unwrap();
        assert!(e3012 < e1001);
        assert!(report.contains("  EMPTY_FILE: 1 occurrence"));
        assert!(report.contains("Recommendations:"));
        assert!(report.contains("Success rate: 33.3%"));
    }

    #[test]
    fn passing_run_has_no_recommendations() {
        let summary = ValidationSummary::from_results(
            vec![ValidationResult::from_issues("ok.yml", vec![], Duration::ZERO)],
            Duration::ZERO,
        );
        let report = format_validation_summary(&summary);
        assert!(!report.contains("Recommendations"));
        assert!(report.contains("  ✓ ok.yml"));
    }
}
