//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, LintArgs};
use crate::error::Result;
use crate::ui::UserInterface;

/// Process exit codes.
pub mod exit_code {
    /// Everything passed.
    pub const SUCCESS: i32 = 0;
    /// Validation or compatibility failures, or an operation error.
    pub const FAILURE: i32 = 1;
    /// No templates were found to validate.
    pub const NO_TEMPLATES: i32 = 2;
    /// The virtual environment or cfn-lint could not be set up.
    pub const ENVIRONMENT: i32 = 3;
    /// The project root, configuration or templates directory is unusable.
    pub const CONFIGURATION: i32 = 4;
}

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: exit_code::SUCCESS,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Success or [`exit_code::FAILURE`].
    pub fn from_success(success: bool) -> Self {
        if success {
            Self::success()
        } else {
            Self::failure(exit_code::FAILURE)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project root.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Dispatch and execute a command.
    ///
    /// Running without a subcommand lints with default arguments.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Lint(args)) => {
                super::lint::LintCommand::new(&self.project_root, args.clone()).execute(ui)
            }
            Some(Commands::Discover(args)) => {
                super::discover::DiscoverCommand::new(&self.project_root, args.clone()).execute(ui)
            }
            Some(Commands::Env(args)) => {
                super::env::EnvCommand::new(&self.project_root, args.clone()).execute(ui)
            }
            Some(Commands::Setup) => super::setup::SetupCommand::new(&self.project_root).execute(ui),
            Some(Commands::Inspect(args)) => super::inspect::InspectCommand::new(args.clone()).execute(ui),
            Some(Commands::Compat(args)) => super::compat::CompatCommand::new(args.clone()).execute(ui),
            Some(Commands::ReplaceBucket(args)) => {
                super::replace_bucket::ReplaceBucketCommand::new(args.clone()).execute(ui)
            }
            Some(Commands::Inventory(args)) => {
                super::inventory::InventoryCommand::new(args.clone()).execute(ui)
            }
            Some(Commands::Config(args)) => {
                super::config::ConfigCommand::new(&self.project_root, args.clone()).execute(ui)
            }
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
            None => super::lint::LintCommand::new(&self.project_root, LintArgs::default()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(exit_code::ENVIRONMENT);
        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
    }

    #[test]
    fn command_result_from_success() {
        assert_eq!(CommandResult::from_success(true).exit_code, 0);
        assert_eq!(CommandResult::from_success(false).exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.project_root(), Path::new("/test"));
    }
}
