//! Session commands: interactive start, quick session and preview.

use tracing::debug;

use super::{open_storage, resolve_limit};
use crate::cli::args::{OutputFormat, StartArgs};
use crate::config::{Config, Paths};
use crate::core::{Clock, SystemClock};
use crate::error::BreatheError;
use crate::features::breathing::{self, NullRecorder, SessionRecorder, StopOutcome, QUICK_PRESET_ID};
use crate::output::{format_stop_pretty, format_timeline, to_json};
use crate::tui::{self, SessionOptions};

/// Open the session screen.
///
/// A preset named on the command line starts right away; otherwise the
/// default preset is highlighted and waits for enter or space.
///
/// # Errors
///
/// Returns an error if the preset or limit is invalid, storage cannot be
/// opened, or the terminal fails.
pub fn start(
    config: &Config,
    paths: &Paths,
    args: &StartArgs,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let catalog = config.catalog()?;
    let key = args
        .preset
        .as_deref()
        .unwrap_or(&config.breathing.default_preset);
    let preset_id = catalog.find(key)?.id.clone();
    let limit = resolve_limit(args.limit.as_deref(), config.breathing.session_limit_seconds)?;

    let outcomes = tui::run(SessionOptions {
        catalog: &catalog,
        preset_id: &preset_id,
        autostart: args.preset.is_some(),
        session_limit: limit,
        tick_interval: config.tick_interval(),
        recorder: recorder(paths, config, args.no_record)?,
    })?;

    format_outcomes(&outcomes, format)
}

/// Run the capped quick session.
///
/// # Errors
///
/// Returns an error if storage cannot be opened or the terminal fails.
pub fn quick(
    config: &Config,
    paths: &Paths,
    no_record: bool,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let catalog = config.catalog()?;

    let outcomes = tui::run(SessionOptions {
        catalog: &catalog,
        preset_id: QUICK_PRESET_ID,
        autostart: true,
        session_limit: Some(config.breathing.quick_session_seconds),
        tick_interval: config.tick_interval(),
        recorder: recorder(paths, config, no_record)?,
    })?;

    format_outcomes(&outcomes, format)
}

/// Print a preset's timeline without waiting.
///
/// # Errors
///
/// Returns an error if the preset, length or limit is invalid.
pub fn preview(
    config: &Config,
    key: &str,
    seconds: u64,
    limit: Option<&str>,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let catalog = config.catalog()?;
    let preset = catalog.find(key)?;
    let limit = resolve_limit(limit, None)?;

    let timeline = breathing::preview(preset, seconds, limit, SystemClock.now())?;
    format_timeline(&timeline, format)
}

fn recorder(
    paths: &Paths,
    config: &Config,
    no_record: bool,
) -> Result<Box<dyn SessionRecorder>, BreatheError> {
    if no_record {
        debug!("recording disabled");
        return Ok(Box::new(NullRecorder));
    }
    Ok(Box::new(open_storage(paths, config)?))
}

fn format_outcomes(outcomes: &[StopOutcome], format: OutputFormat) -> Result<String, BreatheError> {
    match format {
        OutputFormat::Json => to_json(&outcomes),
        OutputFormat::Pretty => Ok(format_stop_pretty(outcomes)),
    }
}
