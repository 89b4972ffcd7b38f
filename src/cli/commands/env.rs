//! Env command implementation.
//!
//! The `cfn-linter env` command shows the detected execution context and
//! the validation settings that `lint` would use.

use std::path::{Path, PathBuf};

use crate::cli::args::EnvArgs;
use crate::config::load_config;
use crate::environment::{format_environment_summary, EnvironmentManager};
use crate::error::{LinterError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The env command implementation.
pub struct EnvCommand {
    project_root: PathBuf,
    args: EnvArgs,
}

impl EnvCommand {
    /// Create a new env command.
    pub fn new(project_root: &Path, args: EnvArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }
}

impl Command for EnvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match load_config(&self.project_root) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };
        let env = EnvironmentManager::with_config(&self.project_root, &config);

        if self.args.json {
            let json = serde_json::to_string_pretty(env.config()).map_err(|e| LinterError::Other(e.into()))?;
            ui.report(&json);
            return Ok(CommandResult::success());
        }

        let (is_consistent, issues) = env.detector().verify_environment_consistency();
        ui.report(&format_environment_summary(env.config(), is_consistent, &issues));
        if !is_consistent {
            ui.warning(&format!("{} environment issue(s) detected", issues.len()));
        }

        Ok(CommandResult::success())
    }
}
