use colored::Colorize;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::BreatheError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be written or serialized.
pub fn config(
    cmd: &ConfigCommands,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, BreatheError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => serde_yaml::to_string(config)
                .map_err(|e| BreatheError::Config(format!("Failed to serialize config: {e}"))),
        },

        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(BreatheError::Config(format!(
                    "{} already exists. Use --force to overwrite.",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!(
                "{} Wrote {}",
                "✓".green(),
                paths.config_file.display()
            ))
        }

        ConfigCommands::Path => Ok(paths.config_file.display().to_string()),
    }
}
