//! Machine-readable aggregation of a validation run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::validation::{ValidationIssue, ValidationSummary};

/// Occurrences of one rule across failed templates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleAggregate {
    pub count: usize,
    /// Templates the rule fired in, first-seen order, no duplicates.
    pub templates: Vec<String>,
    /// Message of the first occurrence.
    pub sample_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationReport {
    pub total_templates: usize,
    pub valid_templates: usize,
    pub failed_templates: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub success_rate: f64,
    pub error_types: BTreeMap<String, RuleAggregate>,
    pub warning_types: BTreeMap<String, RuleAggregate>,
    pub failed_template_paths: Vec<String>,
    pub processing_errors: Vec<String>,
}

impl AggregationReport {
    /// Aggregate issues of the failed templates in `summary`.
    pub fn from_summary(summary: &ValidationSummary) -> Self {
        let mut report = Self {
            total_templates: summary.total_templates,
            valid_templates: summary.valid_templates,
            failed_templates: summary.failed_templates,
            total_errors: summary.total_errors,
            total_warnings: summary.total_warnings,
            success_rate: summary.success_rate(),
            error_types: BTreeMap::new(),
            warning_types: BTreeMap::new(),
            failed_template_paths: Vec::new(),
            processing_errors: Vec::new(),
        };

        for result in summary.failed() {
            let path = result.template_path.display().to_string();
            tally(&mut report.error_types, &result.errors, &path);
            tally(&mut report.warning_types, &result.warnings, &path);
            report.failed_template_paths.push(path);
        }

        report
    }
}

fn tally(types: &mut BTreeMap<String, RuleAggregate>, issues: &[ValidationIssue], path: &str) {
    for issue in issues {
        let entry = types
            .entry(issue.rule_id.clone())
            .or_insert_with(|| RuleAggregate {
                count: 0,
                templates: Vec::new(),
                sample_message: issue.message.clone(),
            });
        entry.count += 1;
        if !entry.templates.iter().any(|t| t == path) {
            entry.templates.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Severity, ValidationResult};
    use std::time::Duration;

    #[test]
    fn aggregates_failed_templates_only() {
        let results = vec![
            ValidationResult::from_issues(
                "a.yml",
                vec![
                    ValidationIssue::error("E3012", "first"),
                    ValidationIssue::error("E3012", "second"),
                    ValidationIssue::new("W2001", Severity::Warning, "unused"),
                ],
                Duration::ZERO,
            ),
            ValidationResult::from_issues(
                "b.yml",
                vec![ValidationIssue::error("E3012", "third")],
                Duration::ZERO,
            ),
            ValidationResult::from_issues(
                "c.yml",
                vec![ValidationIssue::new("W2001", Severity::Warning, "passing")],
                Duration::ZERO,
            ),
        ];
        let summary = ValidationSummary::from_results(results, Duration::ZERO);

        let report = AggregationReport::from_summary(&summary);

        let e3012 = &report.error_types["E3012"];
        assert_eq!(e3012.count, 3);
        assert_eq!(e3012.templates, vec!["a.yml", "b.yml"]);
        assert_eq!(e3012.sample_message, "first");
        assert_eq!(report.warning_types["W2001"].count, 1);
        assert_eq!(report.failed_template_paths, vec!["a.yml", "b.yml"]);
        assert!((report.success_rate - 33.333).abs() < 0.01);
    }

    #[test]
    fn empty_summary() {
        let report = AggregationReport::from_summary(&ValidationSummary::default());
        assert_eq!(report.success_rate, 0.0);
        assert!(report.error_types.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["processing_errors"], serde_json::json!([]));
    }
}
