//! Terminal output.
//!
//! Results go to stdout uncolored; messages go to stderr.

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    out: Term,
    err: Term,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Write raw text to stdout, without a trailing newline.
    pub(crate) fn text(&self, text: &str) -> std::io::Result<()> {
        self.out.write_str(text)?;
        self.out.flush()
    }

    /// Write a line to stdout.
    pub(crate) fn line(&self, line: &str) {
        let _ = self.out.write_line(line);
    }

    /// Write a highlighted line (cyan bold) to stdout.
    pub(crate) fn highlight(&self, line: &str) {
        let _ = self
            .out
            .write_line(&self.cyan_bold.apply_to(line).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.err.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.err.write_line(&self.red.apply_to(msg).to_string());
    }
}
