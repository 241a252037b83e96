//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, Output, OutputMode, Theme, UserInterface};

/// Width that `key: value` labels are padded to.
const KEY_WIDTH: usize = 12;

/// Terminal UI implementation.
///
/// Data and status go to stdout; errors go to stderr so that piped output
/// stays machine readable.
pub struct TerminalUI {
    out: Output,
    err: Term,
    theme: Theme,
}

impl TerminalUI {
    /// Create a new terminal UI, colored when the terminal allows it.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_colors(mode, should_use_colors())
    }

    /// Create a terminal UI with colors forced on or off.
    pub fn with_colors(mode: OutputMode, colors: bool) -> Self {
        let theme = if colors { Theme::new() } else { Theme::plain() };

        Self {
            out: Output::new(mode),
            err: Term::stderr(),
            theme,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.out.mode()
    }

    fn message(&mut self, msg: &str) {
        self.out.println(msg);
    }

    fn success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.out.println(&line);
    }

    fn warning(&mut self, msg: &str) {
        let line = self.theme.format_warning(msg);
        self.out.println(&line);
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        let line = self.theme.format_header(title);
        self.out.println(&line);
    }

    fn key_value(&mut self, key: &str, value: &str) {
        let line = self.theme.format_key_value(key, value, KEY_WIDTH);
        self.out.println(&line);
    }

    fn data(&mut self, data: &str) {
        self.out.data(data);
    }
}
