//! Terminal output for the command-line interface.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] capturing output in tests
//!
//! # Example
//!
//! ```
//! use cfn_linter::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Validating templates"); // suppressed when quiet
//! ui.report("Total templates:   3");      // always printed
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, LinterTheme};

/// Where command output goes.
///
/// Reports (validation results, JSON and SARIF payloads, schemas) go to
/// stdout in every output mode so they can be piped. Status lines follow
/// the mode, and warnings and errors go to stderr.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Write command results to stdout, ignoring the output mode.
    fn report(&mut self, text: &str);

    /// Status line, hidden in quiet mode.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    /// Always shown.
    fn error(&mut self, msg: &str);

    /// Spinner for a long-running step; hidden unless the mode shows spinners.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    fn show_header(&mut self, title: &str);

    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Remove the spinner without a final line.
    fn finish_and_clear(&mut self);
}
