//! Setup command implementation.
//!
//! The `cfn-linter setup` command creates the project's virtual environment
//! and installs cfn-lint into it ahead of a lint run.

use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::venv::VirtualEnvManager;

use super::dispatcher::{exit_code, Command, CommandResult};

/// The setup command implementation.
pub struct SetupCommand {
    project_root: PathBuf,
    base_python: Option<PathBuf>,
}

impl SetupCommand {
    /// Create a new setup command.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            base_python: None,
        }
    }

    /// Create the venv with a specific interpreter instead of the one on PATH.
    pub fn with_base_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.base_python = Some(python.into());
        self
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !self.project_root.is_dir() {
            ui.error(&format!(
                "Project root does not exist: {}",
                self.project_root.display()
            ));
            return Ok(CommandResult::failure(exit_code::CONFIGURATION));
        }

        let config = match load_config(&self.project_root) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(exit_code::CONFIGURATION));
            }
        };

        let mut manager = VirtualEnvManager::from_config(&self.project_root, &config);
        if let Some(python) = &self.base_python {
            manager = manager.with_base_python(python);
        }

        let mut spinner = ui.start_spinner(&format!(
            "Setting up {}",
            manager.venv_path().display()
        ));
        match manager.setup_environment() {
            Ok(()) => {
                spinner.finish_success("cfn-lint environment ready");
                ui.success(&format!(
                    "cfn-lint installed in {}",
                    manager.venv_path().display()
                ));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("Setup failed");
                tracing::error!("Environment setup failed: {}", e);
                ui.error(&format!("Failed to set up cfn-lint environment: {}", e));
                Ok(CommandResult::failure(exit_code::ENVIRONMENT))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    #[test]
    fn missing_project_root() {
        let mut ui = MockUI::new();

        let result = SetupCommand::new(Path::new("/nonexistent/cfn-linter-project"))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, exit_code::CONFIGURATION);
        assert!(ui.has_error("Project root does not exist"));
    }

    #[cfg(unix)]
    #[test]
    fn venv_creation_failure_is_an_environment_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let python = temp.path().join("broken-python");
        std::fs::write(&python, "#!/bin/sh\necho 'venv unavailable' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
        let mut ui = MockUI::new();

        let result = SetupCommand::new(temp.path())
            .with_base_python(&python)
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, exit_code::ENVIRONMENT);
        assert!(ui.has_error("venv unavailable"));
        assert!(!temp.path().join(".venv").exists());
    }
}
