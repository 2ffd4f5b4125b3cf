//! breathe - guided breathing exercises for the terminal
//!
//! This crate provides the phase sequencer behind the breathing countdown,
//! the presets it runs, session history stored in `SQLite`, and the CLI and
//! terminal UI on top of them.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod logging;
pub mod output;
pub mod storage;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::BreatheError;
pub use features::breathing::{PhaseSequencer, Preset, SessionRecorder};
