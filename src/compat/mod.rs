//! Backward-compatibility checks between two versions of a template.
//!
//! A replacement template must keep every parameter (with the same `Type`),
//! keep the type of every resource both versions define, preserve selected
//! resource properties and policy statements, and keep every output.

use std::fmt;

use serde::Serialize;
use serde_yaml::Value;

use crate::template::{nested_property, CfnTemplate};

/// Kind of compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatCheck {
    ParameterRetention,
    ResourceType,
    PropertyPreservation,
    StatementPreservation,
    OutputRetention,
}

impl CompatCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParameterRetention => "parameter_retention",
            Self::ResourceType => "resource_type",
            Self::PropertyPreservation => "property_preservation",
            Self::StatementPreservation => "statement_preservation",
            Self::OutputRetention => "output_retention",
        }
    }
}

impl fmt::Display for CompatCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single broken guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub check: CompatCheck,
    pub subject: String,
    pub message: String,
}

/// Result of comparing two templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompatReport {
    pub checks_run: Vec<CompatCheck>,
    pub violations: Vec<Violation>,
}

impl CompatReport {
    pub fn is_compatible(&self) -> bool {
        self.violations.is_empty()
    }

    /// Plain-text rendering for the terminal.
    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "Backward compatibility: {} check(s), {} violation(s)",
            self.checks_run.len(),
            self.violations.len()
        )];
        for violation in &self.violations {
            lines.push(format!("  ✗ [{}] {}", violation.check, violation.message));
        }
        if self.is_compatible() {
            lines.push("  ✓ compatible".to_string());
        }
        lines.join("\n")
    }
}

/// Properties of a resource that must be unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRule {
    pub resource: String,
    pub property: String,
}

impl PropertyRule {
    /// Parse `Resource.Property[.Nested]`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (resource, property) = spec.split_once('.')?;
        if resource.is_empty() || property.is_empty() {
            return None;
        }
        Some(Self {
            resource: resource.to_string(),
            property: property.to_string(),
        })
    }
}

/// What to check beyond parameters, resource types and outputs.
#[derive(Debug, Clone, Default)]
pub struct CompatOptions {
    pub properties: Vec<PropertyRule>,
    /// Resources whose `PolicyDocument` statements must be preserved.
    pub policies: Vec<String>,
    /// Restrict statement checks to these Sids; empty means every Sid in the original.
    pub sids: Vec<String>,
}

/// Compares an original template with its replacement.
pub struct CompatChecker<'a> {
    original: &'a CfnTemplate,
    updated: &'a CfnTemplate,
}

impl<'a> CompatChecker<'a> {
    pub fn new(original: &'a CfnTemplate, updated: &'a CfnTemplate) -> Self {
        Self { original, updated }
    }

    /// Run every applicable check.
    pub fn run(&self, options: &CompatOptions) -> CompatReport {
        let mut report = CompatReport::default();

        self.record(&mut report, CompatCheck::ParameterRetention, self.check_parameters());
        self.record(&mut report, CompatCheck::ResourceType, self.check_resource_types());

        if !options.properties.is_empty() {
            let violations = options
                .properties
                .iter()
                .flat_map(|rule| self.check_property(&rule.resource, &rule.property))
                .collect();
            self.record(&mut report, CompatCheck::PropertyPreservation, violations);
        }

        if !options.policies.is_empty() {
            let violations = options
                .policies
                .iter()
                .flat_map(|resource| self.check_policy_statements(resource, &options.sids))
                .collect();
            self.record(&mut report, CompatCheck::StatementPreservation, violations);
        }

        self.record(&mut report, CompatCheck::OutputRetention, self.check_outputs());
        report
    }

    fn record(&self, report: &mut CompatReport, check: CompatCheck, violations: Vec<Violation>) {
        report.checks_run.push(check);
        report.violations.extend(violations);
    }

    /// Every original parameter exists in the replacement with the same `Type`.
    pub fn check_parameters(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (name, param) in self.original.section_entries("Parameters") {
            let Some(updated) = self.updated.section_entry("Parameters", name) else {
                violations.push(violation(
                    CompatCheck::ParameterRetention,
                    name,
                    format!("Parameter '{}' from original template is missing", name),
                ));
                continue;
            };

            let before = param.get("Type").and_then(Value::as_str);
            let after = updated.get("Type").and_then(Value::as_str);
            if before != after {
                violations.push(violation(
                    CompatCheck::ParameterRetention,
                    name,
                    format!(
                        "Parameter '{}' has different Type: original={}, new={}",
                        name,
                        before.unwrap_or("none"),
                        after.unwrap_or("none")
                    ),
                ));
            }
        }

        violations
    }

    /// Resources defined in both templates keep their `Type`.
    pub fn check_resource_types(&self) -> Vec<Violation> {
        self.original
            .section_entries("Resources")
            .into_iter()
            .filter_map(|(name, resource)| {
                let updated = self.updated.resource(name)?;
                let before = resource.get("Type").and_then(Value::as_str);
                let after = updated.get("Type").and_then(Value::as_str);
                (before != after).then(|| {
                    violation(
                        CompatCheck::ResourceType,
                        name,
                        format!(
                            "Resource '{}' has different Type: original={}, new={}",
                            name,
                            before.unwrap_or("none"),
                            after.unwrap_or("none")
                        ),
                    )
                })
            })
            .collect()
    }

    /// A resource property exists in both templates with identical structure.
    pub fn check_property(&self, resource: &str, property: &str) -> Vec<Violation> {
        let subject = format!("{}.{}", resource, property);
        let before = self.original.resource(resource).and_then(|r| nested_property(r, property));
        let after = self.updated.resource(resource).and_then(|r| nested_property(r, property));

        let message = match (before, after) {
            (None, _) => format!("Property '{}' missing from original template", subject),
            (_, None) => format!("Property '{}' missing from new template", subject),
            (Some(a), Some(b)) if a != b => format!("Property '{}' differs between templates", subject),
            _ => return Vec::new(),
        };

        vec![violation(CompatCheck::PropertyPreservation, &subject, message)]
    }

    /// Policy statements keep their exact structure, matched by `Sid`.
    pub fn check_policy_statements(&self, resource: &str, sids: &[String]) -> Vec<Violation> {
        let before = policy_statements(self.original, resource);
        let after = policy_statements(self.updated, resource);

        let wanted: Vec<&str> = if sids.is_empty() {
            before.iter().map(|(sid, _)| *sid).collect()
        } else {
            sids.iter().map(String::as_str).collect()
        };

        let mut violations = Vec::new();
        for sid in wanted {
            let subject = format!("{}:{}", resource, sid);
            let message = match (find_statement(&before, sid), find_statement(&after, sid)) {
                (None, _) => format!("Statement with Sid '{}' missing from original policy", sid),
                (_, None) => format!("Statement with Sid '{}' missing from new policy", sid),
                (Some(a), Some(b)) if a != b => {
                    format!("Statement with Sid '{}' differs between templates", sid)
                }
                _ => continue,
            };
            violations.push(violation(CompatCheck::StatementPreservation, &subject, message));
        }

        violations
    }

    /// Every original output exists in the replacement.
    pub fn check_outputs(&self) -> Vec<Violation> {
        self.original
            .section_keys("Outputs")
            .into_iter()
            .filter(|name| self.updated.section_entry("Outputs", name).is_none())
            .map(|name| {
                violation(
                    CompatCheck::OutputRetention,
                    name,
                    format!("Output '{}' from original template is missing", name),
                )
            })
            .collect()
    }
}

fn violation(check: CompatCheck, subject: &str, message: String) -> Violation {
    Violation {
        check,
        subject: subject.to_string(),
        message,
    }
}

fn find_statement<'t>(statements: &[(&str, &'t Value)], sid: &str) -> Option<&'t Value> {
    statements.iter().find(|(s, _)| *s == sid).map(|(_, v)| *v)
}

fn policy_statements<'t>(template: &'t CfnTemplate, resource: &str) -> Vec<(&'t str, &'t Value)> {
    template
        .resource(resource)
        .and_then(|r| r.get("Properties"))
        .and_then(|p| p.get("PolicyDocument"))
        .and_then(|d| d.get("Statement"))
        .and_then(Value::as_sequence)
        .map(|stmts| {
            stmts
                .iter()
                .filter_map(|s| s.get("Sid").and_then(Value::as_str).map(|sid| (sid, s)))
                .collect()
        })
        .unwrap_or_default()
}
