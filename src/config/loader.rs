//! Configuration file discovery and loading.

use crate::config::schema::LinterConfig;
use crate::error::{LinterError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".cfn-linter.yml";

/// Path of the project config file for a root (may not exist).
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.cfn-linter.yml` (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Parse configuration from a YAML string.
pub fn parse_config(content: &str, path: &Path) -> Result<LinterConfig> {
    if content.trim().is_empty() {
        return Ok(LinterConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| LinterError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the project config, or defaults when the file does not exist.
///
/// # Errors
///
/// Returns `ConfigParseError` if the file exists but is invalid.
pub fn load_config(project_root: &Path) -> Result<LinterConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        tracing::debug!("No {} found in {}", CONFIG_FILE_NAME, project_root.display());
        return Ok(LinterConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
