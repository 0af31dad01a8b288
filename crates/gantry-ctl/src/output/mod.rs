//! Styled terminal output for `gantry`.
//!
//! Uses `anstyle` for ANSI style definitions and `anstream` for auto-detecting
//! terminal capabilities. Output degrades to plain text when piped, when the
//! terminal doesn't support colors, or under `--no-color`.

mod styles;

use std::io::Write;

pub(crate) use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, HINT, LABEL, SUCCESS, WARNING};

/// Print a success message (green checkmark prefix).
pub(crate) fn success(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓{SUCCESS:#} {SUCCESS}{msg}{SUCCESS:#}").ok();
}

/// Print an error message to stderr (red X prefix).
pub(crate) fn error(msg: impl std::fmt::Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Print a warning message (yellow exclamation prefix).
pub(crate) fn warning(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

/// Print a section header (bold).
pub(crate) fn header(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HEADER}{msg}{HEADER:#}").ok();
}

/// Print a labeled value ("  Label: value" with the label bolded).
pub(crate) fn label(name: impl std::fmt::Display, value: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {LABEL}{name}:{LABEL:#} {value}").ok();
}

/// Print dimmed/muted text (for secondary information).
pub(crate) fn dim(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{DIM}{msg}{DIM:#}").ok();
}

/// Print a hint/suggestion (dimmed, for guidance text).
pub(crate) fn hint(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HINT}{msg}{HINT:#}").ok();
}

/// Print the outcome of checking one workflow: `Checking <name> ... OK|FAILED`.
pub(crate) fn check_status(name: impl std::fmt::Display, passed: bool) {
    let mut out = anstream::stdout().lock();
    if passed {
        writeln!(out, "Checking {name} ... {SUCCESS}OK{SUCCESS:#}").ok();
    } else {
        writeln!(out, "Checking {name} ... {ERROR}FAILED{ERROR:#}").ok();
    }
}

/// Print a detail line under a failed check.
pub(crate) fn failure_detail(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {ERROR}►{ERROR:#} {msg}").ok();
}

/// Print one line of a content diff: `-` for what is on disk, `+` for what would be
/// generated.
pub(crate) fn diff_line(removed: bool, line: &str) {
    let mut out = anstream::stdout().lock();
    if removed {
        writeln!(out, "    {ERROR}- {line}{ERROR:#}").ok();
    } else {
        writeln!(out, "    {SUCCESS}+ {line}{SUCCESS:#}").ok();
    }
}

/// Print a right-aligned file action (`create`, `update`, `identical`) and its target.
/// Actions that changed nothing are dimmed.
pub(crate) fn action(verb: &str, changed: bool, target: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    let style = if changed { SUCCESS } else { DIM };
    writeln!(out, "{style}{verb:>10}{style:#}  {target}").ok();
}

/// Print a list item with a bullet prefix.
pub(crate) fn item(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  • {msg}").ok();
}

/// Print a blank line.
pub(crate) fn blank() {
    let mut out = anstream::stdout().lock();
    writeln!(out).ok();
}

/// Print plain text to stdout (for output that doesn't need styling).
pub(crate) fn plain(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{msg}").ok();
}
