//! Terminal User Interface (TUI) for breathe.
//!
//! Full-screen guided session: preset picker, countdown, instruction and a
//! progress gauge for the current phase. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, IDLE_POLL};
pub use event::{action_for, Action};

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::core::{Clock, SystemClock};
use crate::error::BreatheError;
use crate::features::breathing::{PresetCatalog, SessionRecorder, StopOutcome};

/// What to open the session screen with.
pub struct SessionOptions<'a> {
    pub catalog: &'a PresetCatalog,
    /// Preset highlighted on entry
    pub preset_id: &'a str,
    /// Start the preset right away instead of waiting for enter/space
    pub autostart: bool,
    pub session_limit: Option<u64>,
    pub tick_interval: std::time::Duration,
    pub recorder: Box<dyn SessionRecorder>,
}

/// Run the TUI application.
///
/// Returns every session ended while the screen was open.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(options: SessionOptions<'_>) -> Result<Vec<StopOutcome>, BreatheError> {
    let mut app = App::new(
        SystemClock,
        options.catalog,
        options.preset_id,
        options.recorder,
        options.session_limit,
        options.tick_interval,
    )?;
    if options.autostart {
        app.start_selected()?;
    }

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| BreatheError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| BreatheError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let result = Terminal::new(backend)
        .map_err(|e| BreatheError::Terminal(format!("Failed to create terminal: {e}")))
        .and_then(|mut terminal| {
            let result = run_app(&mut terminal, &mut app);
            terminal.show_cursor().ok();
            result
        });

    // Restore terminal
    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();

    // Whatever happened, a running session still gets recorded.
    app.stop();
    info!(sessions = app.outcomes().len(), "session screen closed");

    result.map(|()| app.into_outcomes())
}

/// Run the main application loop.
fn run_app<B: Backend, C: Clock + Clone>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> Result<(), BreatheError> {
    while !app.should_quit {
        app.apply_due_ticks();

        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| BreatheError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(action) = event::next_action(app.poll_timeout())? {
            app.handle(action)?;
        }
    }

    Ok(())
}
