//! Output formatting for breathe.
//!
//! Every command renders either colored text or JSON, chosen by `--output`.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::BreatheError;
use crate::features::breathing::{Preset, StoredSession, Timeline};

pub use json::*;
pub use pretty::*;

/// Format the preset list based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_presets(
    presets: &[Preset],
    default_id: &str,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_presets_pretty(presets, default_id)),
        OutputFormat::Json => format_presets_json(presets, default_id),
    }
}

/// Format a single preset based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_preset(preset: &Preset, format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_preset_pretty(preset)),
        OutputFormat::Json => to_json(preset),
    }
}

/// Format session history based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_history(
    sessions: &[StoredSession],
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(sessions)),
        OutputFormat::Json => format_history_json(sessions),
    }
}

/// Format a preview timeline based on output format
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_timeline(timeline: &Timeline, format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Pretty => Ok(format_timeline_pretty(timeline)),
        OutputFormat::Json => to_json(timeline),
    }
}
