use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "breathe")]
#[command(about = "Guided breathing exercises in your terminal")]
#[command(long_about = "breathe - guided breathing exercises

Walks you through box breathing, 4-7-8, equal breathing and your own
patterns with a live countdown, and keeps a history of your practice.

QUICK START:
  breathe presets             List available breathing patterns
  breathe start box           Start a box breathing session
  breathe quick               One-minute quick session
  breathe report week         How much you practised this week

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  breathe <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output, or 'json' for
    /// machine-readable output. Defaults to `general.default_output` from
    /// the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log debug output (overridden by BREATHE_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List breathing presets
    ///
    /// Shows the built-in patterns and any custom presets from the config
    /// file. The default preset is marked with '*'.
    ///
    /// # Examples
    ///
    ///   breathe presets
    ///   breathe ls -o json
    #[command(alias = "ls")]
    Presets,

    /// Show a preset and its phases
    ///
    /// Presets can be named by id or by a short alias
    /// (box, calm, 478, energy, quick).
    ///
    /// # Examples
    ///
    ///   breathe show box
    ///   breathe show 4-7-8
    Show {
        /// Preset id or alias
        preset: String,
    },

    /// Start an interactive breathing session
    ///
    /// Opens a full-screen countdown. Keys:
    ///   space  pause / resume       enter  start selected preset
    ///   s      stop and record      r      reset to the first phase
    ///   j/k    choose preset        q      quit (records the session)
    ///
    /// # Examples
    ///
    ///   breathe start
    ///   breathe start calm --limit 5m
    ///   breathe start box --no-record
    #[command(alias = "s")]
    Start(StartArgs),

    /// One-minute quick session
    ///
    /// Slow in-and-out breathing that stops by itself after
    /// `breathing.quick_session_seconds` (60 by default).
    #[command(alias = "q")]
    Quick {
        /// Don't save the session to history
        #[arg(long)]
        no_record: bool,
    },

    /// Print a preset's second-by-second timeline
    ///
    /// Runs the session instantly instead of in real time, which is handy
    /// for checking a custom preset.
    ///
    /// # Examples
    ///
    ///   breathe preview box
    ///   breathe preview calm --seconds 40
    ///   breathe preview quick --limit 60 --seconds 90 -o json
    Preview {
        /// Preset id or alias
        preset: String,

        /// Number of seconds to play
        #[arg(long, short = 's', default_value_t = 16)]
        seconds: u64,

        /// Stop after this long (e.g. 60, 1m, 90s)
        #[arg(long, short = 'l')]
        limit: Option<String>,
    },

    /// Show recorded sessions
    ///
    /// # Examples
    ///
    ///   breathe history
    ///   breathe history --limit 50
    ///   breathe history --preset box
    #[command(alias = "h")]
    History {
        /// Maximum number of sessions
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,

        /// Only sessions of this preset
        #[arg(long, short = 'p')]
        preset: Option<String>,
    },

    /// Summarise your practice
    ///
    /// Periods: today, week, month, all
    ///
    /// # Examples
    ///
    ///   breathe report
    ///   breathe report month -o json
    Report {
        /// Report period
        #[arg(default_value = "week")]
        period: String,
    },

    /// Delete all recorded sessions
    Clear {
        /// Confirm deletion
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: breathe completions zsh > ~/.zfunc/_breathe
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct StartArgs {
    /// Preset id or alias (defaults to `breathing.default_preset`)
    pub preset: Option<String>,

    /// Stop after this long (e.g. 300, 5m, 1m30s)
    #[arg(long, short = 'l')]
    pub limit: Option<String>,

    /// Don't save the session to history
    #[arg(long)]
    pub no_record: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the config file location
    Path,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start() {
        let cli = Cli::parse_from(["breathe", "start", "calm", "--limit", "5m", "--no-record"]);
        let Commands::Start(args) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.preset.as_deref(), Some("calm"));
        assert_eq!(args.limit.as_deref(), Some("5m"));
        assert!(args.no_record);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_global_output_after_subcommand() {
        let cli = Cli::parse_from(["breathe", "preview", "box", "-o", "json"]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        let Commands::Preview { seconds, .. } = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(seconds, 16);
    }
}
