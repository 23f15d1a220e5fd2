//! Terminal reporting for CLI commands.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// Reporter writing human-oriented messages to stderr.
///
/// Document output goes to stdout, so nothing here may write there.
pub(crate) struct Output {
    term: Term,
    done: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    /// Create a reporter on stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    /// Report rejected or unknown blocks, one line each (yellow).
    pub(crate) fn block_warnings(&self, warnings: &[String]) {
        for warning in warnings {
            self.line(Some(&self.warn), &format!("warning: {warning}"));
        }
    }

    /// Report a written output file with a short summary.
    pub(crate) fn written(&self, path: &Path, summary: &str) {
        self.line(None, summary);
        self.line(Some(&self.done), &format!("Wrote {}", path.display()));
    }

    /// Report a fatal error (red).
    pub(crate) fn failure(&self, err: &dyn Display) {
        self.line(Some(&self.fail), &format!("Error: {err}"));
    }

    fn line(&self, style: Option<&Style>, msg: &str) {
        let _ = match style {
            Some(style) => self.term.write_line(&style.apply_to(msg).to_string()),
            None => self.term.write_line(msg),
        };
    }
}
