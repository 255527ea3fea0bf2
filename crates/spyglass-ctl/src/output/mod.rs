//! Styled terminal output for `spyglass-ctl`.
//!
//! Uses `anstyle` for ANSI style definitions and `anstream` for auto-detecting
//! terminal capabilities. Output degrades to plain text when piped.
//!
//! Generated code goes to stdout untouched ([`plain`]); status lines that
//! accompany it go to stderr ([`status`], [`error`]) so the code can be piped.

mod styles;

use std::fmt::Display;
use std::io::Write;

use spyglass_core::controller::{STATUS_COMPILING, STATUS_ERRORS, STATUS_READY, STATUS_SUCCESS};

pub(crate) use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, LABEL, PROGRESS, SUCCESS, WARNING};

/// Print a success message (green checkmark prefix).
pub(crate) fn success(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓{SUCCESS:#} {SUCCESS}{msg}{SUCCESS:#}").ok();
}

/// Print an error message to stderr (red X prefix).
pub(crate) fn error(msg: impl Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Print a warning message (yellow exclamation prefix).
pub(crate) fn warning(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

/// Print a section header (bold).
pub(crate) fn header(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HEADER}{msg}{HEADER:#}").ok();
}

/// Print a labeled value ("  Label: value" with the label bolded).
pub(crate) fn label(name: impl Display, value: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {LABEL}{name}:{LABEL:#} {value}").ok();
}

/// Print dimmed text (secondary information, hints).
pub(crate) fn dim(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{DIM}{msg}{DIM:#}").ok();
}

/// Print a list item with a bullet prefix.
pub(crate) fn item(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  • {msg}").ok();
}

pub(crate) fn blank() {
    let mut out = anstream::stdout().lock();
    writeln!(out).ok();
}

/// Print plain text to stdout (generated code, JSON).
pub(crate) fn plain(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{msg}").ok();
}

/// Print a controller status line to stderr, colored by outcome.
pub(crate) fn status(status: &str) {
    let style = match status {
        STATUS_SUCCESS => SUCCESS,
        STATUS_COMPILING => PROGRESS,
        STATUS_READY => DIM,
        STATUS_ERRORS => WARNING,
        _ => ERROR,
    };
    let mut out = anstream::stderr().lock();
    writeln!(out, "{style}[{status}]{style:#}").ok();
}
