//! Style constants and clap help styling.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Successful generation, healthy engines.
pub(crate) const SUCCESS: Style = fg(AnsiColor::Green);

/// Faults and failed generations.
pub(crate) const ERROR: Style = fg(AnsiColor::Red);

/// Template errors and skipped plugins.
pub(crate) const WARNING: Style = fg(AnsiColor::Yellow);

/// In-flight status ("Compiling...").
pub(crate) const PROGRESS: Style = fg(AnsiColor::Cyan);

pub(crate) const HEADER: Style = Style::new().effects(Effects::BOLD);

pub(crate) const LABEL: Style = Style::new().effects(Effects::BOLD);

/// Secondary information and hints.
pub(crate) const DIM: Style = Style::new().effects(Effects::DIMMED);

/// Clap help palette matching the output helpers.
pub(crate) fn clap_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(SUCCESS.effects(Effects::BOLD))
        .usage(SUCCESS.effects(Effects::BOLD))
        .literal(PROGRESS)
        .placeholder(PROGRESS)
        .error(ERROR.effects(Effects::BOLD))
        .valid(SUCCESS)
        .invalid(WARNING)
}
