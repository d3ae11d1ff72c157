//! Timestamped, colored operator log lines on stderr.
//!
//! Use the crate-level macros (`log_info!`, `log_success!`, `log_warn!`,
//! `log_error!`, `log_detail!`) rather than calling `emit` directly.

use chrono::Local;
use colored::{ColoredString, Colorize};

const SECTION_WIDTH: usize = 58;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
    Detail,
}

impl Level {
    fn prefix(&self) -> &'static str {
        match self {
            Level::Info => "→ ",
            Level::Success => "✓ ",
            Level::Warn => "⚠ ",
            Level::Error => "✗ ",
            Level::Detail => "  ",
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        match self {
            Level::Info | Level::Detail => text.cyan(),
            Level::Success => text.green(),
            Level::Warn => text.yellow(),
            Level::Error => text.red(),
        }
    }
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

pub fn format_line(level: Level, message: &str) -> String {
    format!("[{}] {}{}", timestamp(), level.prefix(), message)
}

pub fn emit(level: Level, message: &str) {
    eprintln!("{}", level.paint(&format_line(level, message)));
}

/// One row of a checklist, e.g. a tool or file that is present or missing.
pub fn check_row(label: &str, width: usize, ok: bool) {
    let row = format!("  {:<width$}  {}", label, if ok { "✓" } else { "✗" }, width = width);
    let line = format!("[{}] {}", timestamp(), row);
    if ok {
        eprintln!("{}", line.green());
    } else {
        eprintln!("{}", line.red());
    }
}

/// Boxed header printed at the start of each pipeline section.
pub fn section(title: &str) {
    let bar = "═".repeat(SECTION_WIDTH);
    eprintln!();
    eprintln!("{}", format!("╔{}╗", bar).blue());
    eprintln!(
        "{}",
        format!("║  {:<width$}║", title, width = SECTION_WIDTH - 2).blue()
    );
    eprintln!("{}", format!("╚{}╝", bar).blue());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_line_has_timestamp_and_prefix() {
        let line = format_line(Level::Warn, "file missing");
        assert!(line.starts_with('['));
        assert_eq!(&line[9..11], "] ");
        assert!(line.ends_with("⚠ file missing"));
    }

    #[test]
    fn error_prefix_is_cross_marker() {
        assert!(format_line(Level::Error, "boom").contains("✗ boom"));
    }
}
