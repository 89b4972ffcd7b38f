//! Project configuration.
//!
//! Configuration is layered, highest priority first:
//! 1. Command-line flags (and their `CFN_LINTER_*` environment fallbacks)
//! 2. The project file `.cfn-linter.yml`
//! 3. Defaults for the detected execution context
//!
//! # Example
//!
//! ```
//! use cfn_linter::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".cfn-linter.yml"), "templates_dir: cfn").unwrap();
//!
//! let config = load_config(temp.path()).unwrap();
//! assert_eq!(config.templates_dir(), "cfn");
//! ```

pub mod loader;
pub mod schema;

pub use loader::{config_path, find_project_root, load_config, parse_config, CONFIG_FILE_NAME};
pub use schema::{
    config_json_schema, LinterConfig, DEFAULT_CFN_LINT_REQUIREMENT, DEFAULT_TEMPLATES_DIR,
};
