use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::BreatheError;
use crate::output::{format_preset, format_presets};

/// List every preset, marking the configured default.
///
/// # Errors
///
/// Returns an error if a custom preset is malformed or formatting fails.
pub fn presets(config: &Config, format: OutputFormat) -> Result<String, BreatheError> {
    let catalog = config.catalog()?;
    // An unknown default just leaves nothing marked.
    let default_id = catalog
        .find(&config.breathing.default_preset)
        .map(|p| p.id.clone())
        .unwrap_or_default();
    format_presets(catalog.all(), &default_id, format)
}

/// Show one preset in detail.
///
/// # Errors
///
/// Returns `BreatheError::NotFound` if no preset matches `key`.
pub fn show(config: &Config, key: &str, format: OutputFormat) -> Result<String, BreatheError> {
    let catalog = config.catalog()?;
    format_preset(catalog.find(key)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::breathing::{Phase, Preset};

    #[test]
    fn test_custom_preset_listed() {
        let mut config = Config::default();
        config.breathing.custom_presets.push(Preset {
            id: "long-exhale".to_string(),
            title: "Long Exhale".to_string(),
            description: String::new(),
            phases: vec![
                Phase::new("inhale", 4, "In"),
                Phase::new("exhale", 8, "Out"),
            ],
        });
        config.breathing.default_preset = "long-exhale".to_string();

        let json = presets(&config, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["count"], 5);
        assert_eq!(value["items"][4]["id"], "long-exhale");
        assert_eq!(value["items"][4]["default"], true);
    }

    #[test]
    fn test_show_unknown() {
        let err = show(&Config::default(), "wim-hof", OutputFormat::Pretty).unwrap_err();
        assert!(err.to_string().contains("wim-hof"));
    }

    #[test]
    fn test_show_by_alias() {
        let json = show(&Config::default(), "478", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["id"], "calm-breathing");
    }
}
