//! History, report and clear commands.

use chrono::Utc;
use colored::Colorize;

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::BreatheError;
use crate::features::breathing::{PracticeReport, ReportPeriod, SessionStorage};
use crate::output::{format_history, to_json};

/// Show recent sessions, optionally for one preset.
///
/// # Errors
///
/// Returns an error if the preset is unknown or the query fails.
pub fn history(
    storage: &SessionStorage,
    config: &Config,
    limit: usize,
    preset: Option<&str>,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let sessions = match preset {
        Some(key) => {
            // Resolve aliases, but still allow ids of presets since removed
            // from the config.
            let id = config
                .catalog()?
                .find(key)
                .map_or_else(|_| key.to_string(), |p| p.id.clone());
            storage.get_by_preset(&id, limit)?
        }
        None => storage.get_recent(limit)?,
    };
    format_history(&sessions, format)
}

/// Summarise practice over a period. Days are UTC days, matching how
/// sessions are stored.
///
/// # Errors
///
/// Returns an error if the sessions cannot be read.
pub fn report(
    storage: &SessionStorage,
    period: &str,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    let period = ReportPeriod::parse(period);
    let report = PracticeReport::generate(storage, period, Utc::now().date_naive())?;

    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Pretty => Ok(report.format()),
    }
}

/// Delete every recorded session for this user.
///
/// # Errors
///
/// Returns `BreatheError::Validation` without `--force`.
pub fn clear(
    storage: &SessionStorage,
    force: bool,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    if !force {
        return Err(BreatheError::Validation(
            "This will delete all breathing session history.\nUse --force to confirm.".to_string(),
        ));
    }

    let deleted = storage.clear()?;

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({ "deleted": deleted })),
        OutputFormat::Pretty => Ok(format!("{} Deleted {deleted} sessions.", "✓".green())),
    }
}
