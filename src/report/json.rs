//! JSON report formatter.

use std::io::Write;

use serde::Serialize;

use super::{AggregationReport, ReportFormatter};
use crate::validation::{ValidationResult, ValidationSummary};

/// Formats a run as JSON: the aggregation plus every per-template result.
#[derive(Debug, Default)]
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    execution_time: f64,
    summary: AggregationReport,
    results: &'a [ValidationResult],
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(&self, summary: &ValidationSummary, writer: &mut W) -> std::io::Result<()> {
        let output = JsonOutput {
            passed: !summary.has_failures(),
            execution_time: summary.execution_time.as_secs_f64(),
            summary: AggregationReport::from_summary(summary),
            results: &summary.results,
        };

        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationIssue;
    use std::time::Duration;

    #[test]
    fn output_is_valid_json() {
        let summary = ValidationSummary::from_results(
            vec![ValidationResult::from_issues(
                "/repo/t.yml",
                vec![ValidationIssue::error("E3012", "bad").with_location(Some(3), Some(1))],
                Duration::ZERO,
            )],
            Duration::ZERO,
        );

        let mut out = Vec::new();
        JsonFormatter::new().format(&summary, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["passed"], false);
        assert_eq!(value["summary"]["failed_templates"], 1);
        assert_eq!(value["summary"]["error_types"]["E3012"]["count"], 1);
        assert_eq!(value["results"][0]["errors"][0]["line_number"], 3);
        assert_eq!(value["results"][0]["errors"][0]["severity"], "error");
    }
}
