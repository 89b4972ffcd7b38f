//! Error types for cfn-linter operations.
//!
//! This module defines [`LinterError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `LinterError` for failures that stop an operation outright
//! - Problems with an individual template are not errors: they are reported
//!   as issues on its [`ValidationResult`](crate::validation::ValidationResult)
//! - Use `anyhow::Error` (via `LinterError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cfn-linter operations.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Project root directory does not exist.
    #[error("Project root does not exist: {path}")]
    ProjectRootNotFound { path: PathBuf },

    /// Failed to parse the project configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The virtual environment could not be created or is broken.
    #[error("Virtual environment error at {path}: {message}")]
    VenvCreation { path: PathBuf, message: String },

    /// Installing linter dependencies into the virtual environment failed.
    #[error("Failed to install dependencies: {message}")]
    DependencyInstall { message: String },

    /// No usable cfn-lint executable could be located.
    #[error("cfn-lint is not available: {message}")]
    CfnLintUnavailable { message: String },

    /// A subprocess could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess ran longer than its allotted time.
    #[error("Command timed out after {seconds} seconds: {command}")]
    CommandTimeout { command: String, seconds: u64 },

    /// Template file does not exist.
    #[error("Template file not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// Template file is not valid YAML.
    #[error("Failed to parse template {path}: {message}")]
    TemplateParseError { path: PathBuf, message: String },

    /// Referenced template parameter does not exist.
    #[error("Parameter '{name}' not found in template")]
    MissingParameter { name: String },

    /// Referenced template condition does not exist.
    #[error("Condition '{name}' not found in template")]
    MissingCondition { name: String },

    /// S3 bucket access or listing failed.
    #[error("{message}")]
    S3Access { bucket: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for cfn-linter operations.
pub type Result<T> = std::result::Result<T, LinterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_root_not_found_displays_path() {
        let err = LinterError::ProjectRootNotFound {
            path: PathBuf::from("/missing/root"),
        };
        assert!(err.to_string().contains("/missing/root"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = LinterError::ConfigParseError {
            path: PathBuf::from("/repo/.cfn-linter.yml"),
            message: "unknown field `foo`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".cfn-linter.yml"));
        assert!(msg.contains("unknown field"));
    }

    #[test]
    fn command_timeout_displays_seconds() {
        let err = LinterError::CommandTimeout {
            command: "cfn-lint --format json t.yml".into(),
            seconds: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("30 seconds"));
        assert!(msg.contains("cfn-lint"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = LinterError::CommandFailed {
            command: "pip install cfn-lint".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("pip install cfn-lint"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn missing_parameter_displays_name() {
        let err = LinterError::MissingParameter {
            name: "InvalidatorArn".into(),
        };
        assert_eq!(
            err.to_string(),
            "Parameter 'InvalidatorArn' not found in template"
        );
    }

    #[test]
    fn s3_access_displays_message_only() {
        let err = LinterError::S3Access {
            bucket: "b".into(),
            message: "Bucket 'b' does not exist".into(),
        };
        assert_eq!(err.to_string(), "Bucket 'b' does not exist");
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: LinterError = io_err.into();
        assert!(matches!(err, LinterError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: LinterError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
