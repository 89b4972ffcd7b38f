//! Plain line output for build pipelines and redirected stdout.

use super::{OutputMode, SpinnerHandle, UserInterface};

/// Plain-text UI used when stdout is not a terminal.
///
/// Spinners are replaced by a single status line per operation so build
/// logs stay readable.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn report(&mut self, text: &str) {
        println!("{}", text);
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_warnings() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let verbose = self.mode.is_verbose();
        if verbose {
            println!("{}", message);
        }
        Box::new(LineSpinner {
            verbose,
            status: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}", title);
        }
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Progress stand-in: per-template lines only when verbose, outcomes otherwise.
struct LineSpinner {
    verbose: bool,
    status: bool,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, msg: &str) {
        if self.verbose {
            println!("  {}", msg);
        }
    }

    fn finish_success(&mut self, msg: &str) {
        if self.status {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn finish_and_clear(&mut self) {}
}
