//! Template validation with cfn-lint.
//!
//! Each template is checked for basic readability and then handed to
//! `cfn-lint --format json`. Problems with the file or the linter are reported
//! as error issues with synthetic rule ids (see [`codes`]) so a run always
//! produces a result per template.

pub mod parser;
pub mod types;
pub mod validator;

pub use parser::{excerpt, parse_lint_output};
pub use types::{codes, Severity, ValidationIssue, ValidationResult, ValidationSummary};
pub use validator::CfnValidator;
