//! Terminal output utilities for styled CLI output.
//!
//! Commands print through [`Output`] instead of calling `println!`, so every
//! line carries a consistent status prefix.

use std::fmt::Display;

use console::{Term, style};
use drivedeck_business::{Notification, Severity};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        drop(self.term.write_line(text));
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {}", style("✓").green().bold(), message));
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {}", style("✗").red().bold(), message));
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {}", style("⚠").yellow().bold(), message));
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        self.line(&format!("{} {}", style("ℹ").blue().bold(), message));
    }

    /// Print a controller notification with the prefix of its severity.
    pub fn notification(&self, notification: &Notification) {
        match notification.severity {
            Severity::Success => self.success(notification),
            Severity::Info => self.info(notification),
            Severity::Warning => self.warning(notification),
            Severity::Error => self.error(notification),
        }
    }

    pub fn notifications(&self, notifications: &[Notification]) {
        for notification in notifications {
            self.notification(notification);
        }
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    /// Print a header with emphasis.
    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    /// Print a labeled value with indentation.
    pub fn labeled_indent(&self, label: impl Display, value: impl Display, indent: usize) {
        let spaces = " ".repeat(indent);
        self.line(&format!("{spaces}{}: {}", style(label).dim(), value));
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    /// Print a total summary line.
    pub fn total(&self, label: impl Display, count: usize) {
        self.line(&format!(
            "\n{}: {}",
            style(label).bold(),
            style(format!("{count} file(s)")).cyan()
        ));
    }
}
