//! cfn-linter - CloudFormation template validation and pipeline tooling.
//!
//! cfn-linter finds the CloudFormation templates in a repository, runs
//! cfn-lint against each one inside a managed Python virtual environment,
//! and reports the results for developers and build pipelines alike. It also
//! ships the smaller tools a template pipeline needs: structural template
//! inspection, backward-compatibility checks, bucket placeholder
//! substitution for packaged templates, and versioned S3 inventories.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`compat`] - Backward-compatibility checks between template versions
//! - [`config`] - `.cfn-linter.yml` loading and schema
//! - [`discovery`] - Template discovery and categorization
//! - [`environment`] - Execution context detection and validation settings
//! - [`error`] - Error types and result aliases
//! - [`inventory`] - Versioned S3 bucket inventories
//! - [`report`] - Human, JSON and SARIF validation reports
//! - [`rewrite`] - Bucket placeholder substitution
//! - [`shell`] - External process execution
//! - [`template`] - Structural template queries
//! - [`ui`] - Spinners and terminal output
//! - [`validation`] - cfn-lint invocation and result parsing
//! - [`venv`] - Virtual environment management and cfn-lint location
//!
//! # Example
//!
//! ```
//! use cfn_linter::validation::{parse_lint_output, Severity};
//!
//! let stdout = r#"[{"Rule": {"Id": "E3012"}, "Level": "Error",
//!     "Message": "Property Type must be String",
//!     "Location": {"Start": {"LineNumber": 4, "ColumnNumber": 7}}}]"#;
//!
//! let issues = parse_lint_output(stdout, "", false);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].rule_id, "E3012");
//! assert_eq!(issues[0].severity, Severity::Error);
//! assert_eq!(issues[0].location_suffix(), " (line 4, col 7)");
//! ```

pub mod cli;
pub mod compat;
pub mod config;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod inventory;
pub mod report;
pub mod rewrite;
pub mod shell;
pub mod template;
pub mod ui;
pub mod validation;
pub mod venv;

pub use error::{LinterError, Result};
