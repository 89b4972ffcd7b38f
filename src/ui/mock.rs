//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use cfn_linter::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.message("Found 3 templates");
//! ui.report("Total templates:   3");
//!
//! assert!(ui.has_message("3 templates"));
//! assert!(ui.has_report("Total templates"));
//! assert!(!ui.has_message("Total templates"));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    reports: Vec<String>,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<Rc<RefCell<MockSpinner>>>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn reports(&self) -> &[String] {
        &self.reports
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Snapshot of every spinner started so far.
    pub fn spinners(&self) -> Vec<MockSpinner> {
        self.spinners.iter().map(|s| s.borrow().clone()).collect()
    }

    /// All messages joined with newlines.
    /// Everything reported, as it would appear on stdout.
    pub fn output(&self) -> String {
        self.reports.join("\n")
    }

    pub fn has_report(&self, text: &str) -> bool {
        self.reports.iter().any(|r| r.contains(text))
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn report(&mut self, text: &str) {
        self.reports.push(text.to_string());
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = Rc::new(RefCell::new(MockSpinner {
            messages: vec![message.to_string()],
            ..Default::default()
        }));
        self.spinners.push(Rc::clone(&spinner));
        Box::new(SharedSpinner(spinner))
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Captured state of a spinner.
#[derive(Debug, Clone, Default)]
pub struct MockSpinner {
    messages: Vec<String>,
    finish_message: Option<String>,
    status: Option<SpinnerStatus>,
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Cleared,
}

impl MockSpinner {
    /// Messages in order, starting with the initial one.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn finish_message(&self) -> Option<&str> {
        self.finish_message.as_deref()
    }

    pub fn status(&self) -> Option<SpinnerStatus> {
        self.status
    }
}

struct SharedSpinner(Rc<RefCell<MockSpinner>>);

impl SpinnerHandle for SharedSpinner {
    fn set_message(&mut self, msg: &str) {
        self.0.borrow_mut().messages.push(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let mut spinner = self.0.borrow_mut();
        spinner.finish_message = Some(msg.to_string());
        spinner.status = Some(SpinnerStatus::Success);
    }

    fn finish_error(&mut self, msg: &str) {
        let mut spinner = self.0.borrow_mut();
        spinner.finish_message = Some(msg.to_string());
        spinner.status = Some(SpinnerStatus::Error);
    }

    fn finish_and_clear(&mut self) {
        self.0.borrow_mut().status = Some(SpinnerStatus::Cleared);
    }
}
