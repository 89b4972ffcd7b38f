//! Validation report formatters.
//!
//! This module renders a [`ValidationSummary`] as human-readable text, a
//! long-form aggregated report, JSON, or SARIF.

pub mod aggregation;
pub mod full;
pub mod human;
pub mod json;
pub mod sarif;

use std::io::Write;

use clap::ValueEnum;

use crate::validation::ValidationSummary;

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Human,
    /// Long-form report with error aggregation and recommendations.
    Full,
    Json,
    Sarif,
}

/// Trait for formatting a validation run.
pub trait ReportFormatter {
    /// Format the summary to the given writer.
    fn format<W: Write>(&self, summary: &ValidationSummary, writer: &mut W) -> std::io::Result<()>;
}

pub use aggregation::{AggregationReport, RuleAggregate};
pub use full::format_validation_summary;
pub use human::HumanFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
