use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use breathe::cli::args::{Cli, Commands};
use breathe::cli::commands;
use breathe::config::{Config, Paths};
use breathe::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new()?;

    // The session screen owns the terminal, so its logs go to a file.
    let interactive = matches!(cli.command, Commands::Start(_) | Commands::Quick { .. });
    if interactive {
        paths.ensure_dirs()?;
        logging::init(cli.verbose, LogTarget::File(&paths.log_file))?;
    } else {
        logging::init(cli.verbose, LogTarget::Stderr)?;
    }

    let config = Config::load_from_path(&paths.config_file)?;
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match &cli.command {
        Commands::Presets => commands::presets(&config, format)?,
        Commands::Show { preset } => commands::show(&config, preset, format)?,
        Commands::Start(args) => commands::start(&config, &paths, args, format)?,
        Commands::Quick { no_record } => commands::quick(&config, &paths, *no_record, format)?,
        Commands::Preview {
            preset,
            seconds,
            limit,
        } => commands::preview(&config, preset, *seconds, limit.as_deref(), format)?,
        Commands::History { limit, preset } => {
            let storage = commands::open_storage(&paths, &config)?;
            commands::history(&storage, &config, *limit, preset.as_deref(), format)?
        }
        Commands::Report { period } => {
            let storage = commands::open_storage(&paths, &config)?;
            commands::report(&storage, period, format)?
        }
        Commands::Clear { force } => {
            let storage = commands::open_storage(&paths, &config)?;
            commands::clear(&storage, *force, format)?
        }
        Commands::Config(args) => commands::config(&args.command, &config, &paths, format)?,
        Commands::Completions { shell } => commands::completions(*shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
