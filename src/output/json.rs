//! JSON output formatting for breathe.

use serde::Serialize;
use serde_json::json;

use crate::error::BreatheError;
use crate::features::breathing::{Preset, StoredSession};

/// Format presets as JSON
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_presets_json(presets: &[Preset], default_id: &str) -> Result<String, BreatheError> {
    let items: Vec<_> = presets
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "title": p.title,
                "description": p.description,
                "pattern": p.pattern(),
                "cycle_seconds": p.cycle_seconds(),
                "default": p.id == default_id,
                "phases": p.phases,
            })
        })
        .collect();

    let output = json!({
        "count": presets.len(),
        "items": items
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format session history as JSON
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn format_history_json(sessions: &[StoredSession]) -> Result<String, BreatheError> {
    let total_seconds: u64 = sessions.iter().map(|s| s.record.duration_seconds).sum();
    let output = json!({
        "count": sessions.len(),
        "total_seconds": total_seconds,
        "items": sessions
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `BreatheError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, BreatheError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::breathing::BUILTIN_PRESETS;

    #[test]
    fn test_presets_json_marks_default() {
        let json = format_presets_json(&BUILTIN_PRESETS, "calm-breathing").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 4);
        assert_eq!(value["items"][0]["id"], "box-breathing");
        assert_eq!(value["items"][0]["pattern"], "4-4-4-4");
        assert_eq!(value["items"][0]["default"], false);
        assert_eq!(value["items"][1]["default"], true);
        assert_eq!(value["items"][1]["phases"][2]["duration_seconds"], 8);
    }

    #[test]
    fn test_empty_history_json() {
        let json = format_history_json(&[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 0);
        assert_eq!(value["total_seconds"], 0);
    }
}
