//! Output mode and writer.

use console::Term;
use std::io::Write;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Report headers, labels and status lines.
    #[default]
    Normal,
    /// Print requested data only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Stdout writer that respects output mode.
#[derive(Debug)]
pub struct Output {
    term: Term,
    mode: OutputMode,
}

impl Output {
    /// Create a new output writer.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            mode,
        }
    }

    /// Get the output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Write a line if the mode allows status messages.
    pub fn println(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    /// Write requested data regardless of mode.
    pub fn data(&mut self, data: &str) {
        writeln!(self.term, "{}", data).ok();
        self.term.flush().ok();
    }
}
