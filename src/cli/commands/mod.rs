//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`cfn-linter lint`, `cfn-linter inventory`)
//! - Shared project root handling
//! - Consistent exit codes

pub mod compat;
pub mod completions;
pub mod config;
pub mod discover;
pub mod dispatcher;
pub mod env;
pub mod inspect;
pub mod inventory;
pub mod lint;
pub mod replace_bucket;
pub mod setup;

pub use dispatcher::{exit_code, Command, CommandDispatcher, CommandResult};
