//! Command-line interface for cfn-linter.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompatArgs, CompletionsArgs, ConfigArgs, DiscoverArgs, EnvArgs, InspectArgs,
    InventoryArgs, LintArgs, ReplaceBucketArgs,
};
pub use commands::{exit_code, Command, CommandDispatcher, CommandResult};
