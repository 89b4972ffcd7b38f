//! Interactive terminal UI.

use std::io::Write;

use console::Term;

use super::{
    should_use_colors, LinterTheme, NonInteractiveUI, OutputMode, ProgressSpinner, SpinnerHandle,
    UserInterface,
};

/// Colored UI with live spinners, used when stdout is a terminal.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: LinterTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            LinterTheme::new()
        } else {
            LinterTheme::plain()
        };
        Self::with_theme(mode, theme)
    }

    pub fn with_theme(mode: OutputMode, theme: LinterTheme) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }

    fn status(&self, line: &str) {
        if self.mode.shows_status() {
            writeln!(&self.out, "{}", line).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn report(&mut self, text: &str) {
        writeln!(&self.out, "{}", text).ok();
    }

    fn message(&mut self, msg: &str) {
        self.status(msg);
    }

    fn success(&mut self, msg: &str) {
        self.status(&self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_warnings() {
            writeln!(&self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(&self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        self.status(&format!("\n{}", self.theme.format_header(title)));
    }

    fn is_interactive(&self) -> bool {
        self.out.is_term()
    }
}

/// Terminal UI when interactive and stdout is a terminal, plain lines otherwise.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_keeps_mode() {
        let ui = TerminalUI::with_theme(OutputMode::Quiet, LinterTheme::plain());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn quiet_terminal_hides_spinners() {
        let mut ui = TerminalUI::with_theme(OutputMode::Quiet, LinterTheme::plain());
        let mut spinner = ui.start_spinner("Validating templates");
        spinner.set_message("Validating app.yml (1/1)");
        spinner.finish_and_clear();
    }

    #[test]
    fn build_pipelines_get_plain_output() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }

    #[test]
    fn create_ui_respects_mode() {
        let ui = create_ui(false, OutputMode::Silent);
        assert_eq!(ui.output_mode(), OutputMode::Silent);
    }
}
