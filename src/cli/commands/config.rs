//! Config command implementation.
//!
//! The `cfn-linter config` command shows the resolved `.cfn-linter.yml`
//! settings, or the JSON Schema describing the file.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{config_json_schema, config_path, load_config};
use crate::error::{LinterError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, args: ConfigArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = serde_json::to_string_pretty(&config_json_schema())
                .map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&schema);
            return Ok(CommandResult::success());
        }

        let config = match load_config(&self.project_root) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        if self.args.json {
            let json = serde_json::to_string_pretty(&config).map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&json);
        } else {
            let path = config_path(&self.project_root);
            if path.is_file() {
                ui.message(&format!("# {}", path.display()));
            } else {
                ui.message("# defaults (no .cfn-linter.yml found)");
            }
            let yaml = serde_yaml::to_string(&config).map_err(|e| LinterError::Other(e.into()))?;
            ui.report(yaml.trim_end());
        }

        Ok(CommandResult::success())
    }
}
