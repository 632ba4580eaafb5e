//! Styled terminal output helpers.
//!
//! Progress and informational lines respect `--quiet`; the report itself is
//! the program's product and always prints.

use console::style;

/// Output handler for consistent CLI formatting
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a progress line
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("❯").cyan(), message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    /// Print a key-value settings line
    pub fn key_value(&self, key: &str, value: &str) {
        println!("  {:<32} {}", style(key).dim(), value);
    }

    /// Print a labeled counter
    pub fn summary_stat(&self, label: &str, value: u64) {
        println!(
            "  {:<44} {}",
            style(label).dim(),
            style(value.to_string()).bold()
        );
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        println!("    • {}", item);
    }
}
