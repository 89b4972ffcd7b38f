//! SARIF output formatter.
//!
//! SARIF (Static Analysis Results Interchange Format) 2.1.0 lets code
//! scanning dashboards pick up cfn-lint findings.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use super::ReportFormatter;
use crate::validation::{Severity, ValidationIssue, ValidationResult, ValidationSummary};

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

/// Formats a validation run as SARIF.
pub struct SarifFormatter {
    pub tool_name: String,
    pub tool_version: String,
    /// Artifact URIs are made relative to this root when possible.
    pub project_root: PathBuf,
}

#[derive(Serialize)]
struct SarifLog {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<SarifRegion>,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_column: Option<u64>,
}

impl SarifFormatter {
    pub fn new(
        tool_name: impl Into<String>,
        tool_version: impl Into<String>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_version: tool_version.into(),
            project_root: project_root.into(),
        }
    }

    fn severity_to_level(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Informational => "note",
        }
    }

    fn to_result(&self, template: &ValidationResult, issue: &ValidationIssue) -> SarifResult {
        let region = issue.line_number.filter(|l| *l > 0).map(|line| SarifRegion {
            start_line: line,
            start_column: issue.column_number.filter(|c| *c > 1),
        });

        SarifResult {
            rule_id: issue.rule_id.clone(),
            level: Self::severity_to_level(issue.severity),
            message: SarifMessage {
                text: issue.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation {
                        uri: template.display_path(&self.project_root),
                    },
                    region,
                },
            }],
        }
    }
}

fn all_issues(result: &ValidationResult) -> impl Iterator<Item = &ValidationIssue> {
    result
        .errors
        .iter()
        .chain(&result.warnings)
        .chain(&result.informational)
}

impl ReportFormatter for SarifFormatter {
    fn format<W: Write>(&self, summary: &ValidationSummary, writer: &mut W) -> std::io::Result<()> {
        let rule_ids: BTreeSet<&str> = summary
            .results
            .iter()
            .flat_map(all_issues)
            .map(|i| i.rule_id.as_str())
            .collect();

        let rules = rule_ids
            .into_iter()
            .map(|id| SarifRule {
                id: id.to_string(),
                short_description: SarifMessage {
                    text: format!("Rule {}", id),
                },
            })
            .collect();

        let results = summary
            .results
            .iter()
            .flat_map(|r| all_issues(r).map(move |issue| self.to_result(r, issue)))
            .collect();

        let log = SarifLog {
            schema: SARIF_SCHEMA,
            version: SARIF_VERSION,
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules,
                    },
                },
                results,
            }],
        };

        serde_json::to_writer_pretty(&mut *writer, &log).map_err(std::io::Error::other)?;
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn render(summary: &ValidationSummary) -> serde_json::Value {
        let formatter = SarifFormatter::new("cfn-linter", "1.0.0", "/repo");
        let mut out = Vec::new();
        formatter.format(summary, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    fn summary() -> ValidationSummary {
        ValidationSummary::from_results(
            vec![ValidationResult::from_issues(
                "/repo/templates/v2/app.yml",
                vec![
                    ValidationIssue::error("E3012", "wrong type").with_location(Some(10), Some(5)),
                    ValidationIssue::new("W2001", Severity::Warning, "unused").with_location(Some(3), Some(1)),
                    ValidationIssue::new("I3011", Severity::Informational, "note"),
                ],
                Duration::ZERO,
            )],
            Duration::ZERO,
        )
    }

    #[test]
    fn produces_valid_sarif() {
        let parsed = render(&summary());
        assert_eq!(parsed["version"], "2.1.0");
        assert_eq!(parsed["runs"][0]["tool"]["driver"]["name"], "cfn-linter");
        assert_eq!(parsed["runs"][0]["results"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn maps_severity_to_sarif_level() {
        assert_eq!(SarifFormatter::severity_to_level(Severity::Error), "error");
        assert_eq!(SarifFormatter::severity_to_level(Severity::Warning), "warning");
        assert_eq!(SarifFormatter::severity_to_level(Severity::Informational), "note");
    }

    #[test]
    fn rules_are_sorted_and_unique() {
        let parsed = render(&summary());
        let ids: Vec<_> = parsed["runs"][0]["tool"]["driver"]["rules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["E3012", "I3011", "W2001"]);
    }

    #[test]
    fn includes_location_information() {
        let parsed = render(&summary());
        let location = &parsed["runs"][0]["results"][0]["locations"][0]["physicalLocation"];

        assert_eq!(location["artifactLocation"]["uri"], "templates/v2/app.yml");
        assert_eq!(location["region"]["startLine"], 10);
        assert_eq!(location["region"]["startColumn"], 5);
    }

    #[test]
    fn omits_column_one_and_missing_lines() {
        let parsed = render(&summary());
        let results = &parsed["runs"][0]["results"];

        assert!(results[1]["locations"][0]["physicalLocation"]["region"]["startColumn"].is_null());
        assert!(results[2]["locations"][0]["physicalLocation"]["region"].is_null());
    }
}
