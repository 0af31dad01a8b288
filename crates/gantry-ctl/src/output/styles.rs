//! Style constants and clap help styling configuration.

use anstyle::{AnsiColor, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}

/// Passing checks, files written.
pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);

/// Failed checks, errors.
pub(crate) const ERROR: Style = fg(AnsiColor::Red);

pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

/// Section headers.
pub(crate) const HEADER: Style = Style::new().effects(Effects::BOLD);

/// Label names in "Label: value" pairs.
pub(crate) const LABEL: Style = Style::new().effects(Effects::BOLD);

/// Secondary information, unchanged files.
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Hints and guidance text.
pub(crate) const HINT: Style = Style::new().effects(Effects::DIMMED);

/// Help output styles in the same palette as command output.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(fg(AnsiColor::Green).effects(Effects::BOLD))
        .usage(fg(AnsiColor::Green).effects(Effects::BOLD))
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(fg(AnsiColor::Red).effects(Effects::BOLD))
        .valid(fg(AnsiColor::Green))
        .invalid(fg(AnsiColor::Yellow))
}
