//! Execution environment detection and resolution.
//!
//! - [`detection`] - Local / build pipeline / test context detection
//! - [`settings`] - Validation settings derived from the context
//! - [`manager`] - Resolved environment shared by the linter components

pub mod detection;
pub mod manager;
pub mod settings;

pub use detection::{
    format_environment_summary, system_python, EnvironmentConfig, EnvironmentDetector,
    ExecutionContext,
};
pub use manager::EnvironmentManager;
pub use settings::ValidationSettings;
