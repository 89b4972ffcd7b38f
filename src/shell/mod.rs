//! External process execution.

pub mod command;

pub use command::{
    display_command, execute, execute_check, find_in_dirs, find_in_path, CommandOptions,
    CommandResult,
};
