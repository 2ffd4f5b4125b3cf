//! Application state for the TUI.

use std::time::Duration;

use tracing::debug;

use crate::core::Clock;
use crate::error::BreatheError;
use crate::features::breathing::{
    Metronome, PhaseSequencer, Preset, PresetCatalog, SessionRecorder, StopOutcome, TickOutcome,
};
use crate::tui::event::Action;

/// How long to wait for input when no tick is scheduled.
pub const IDLE_POLL: Duration = Duration::from_millis(250);

const HELP: &str = "enter:start | space:pause | s:stop | r:reset | j/k:preset | q:quit";

/// Application state.
pub struct App<C: Clock + Clone> {
    clock: C,
    /// Presets in picker order.
    presets: Vec<Preset>,
    /// Currently highlighted preset.
    pub selected: usize,
    sequencer: PhaseSequencer<C>,
    /// Armed only while the session is running.
    metronome: Option<Metronome<C>>,
    tick_interval: Duration,
    /// Sessions ended while the app was open.
    outcomes: Vec<StopOutcome>,
    /// Status message to display.
    pub status: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<C: Clock + Clone> App<C> {
    /// Create an app with `initial` selected but not started.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial` is unknown or the tick interval is zero.
    pub fn new(
        clock: C,
        catalog: &PresetCatalog,
        initial: &str,
        recorder: Box<dyn SessionRecorder>,
        session_limit: Option<u64>,
        tick_interval: Duration,
    ) -> Result<Self, BreatheError> {
        if tick_interval.is_zero() {
            return Err(BreatheError::Validation(
                "tick interval must be greater than zero".to_string(),
            ));
        }

        let preset = catalog.find(initial)?.clone();
        let selected = catalog.position(&preset.id).unwrap_or(0);
        let mut sequencer =
            PhaseSequencer::new(clock.clone(), recorder).with_session_limit(session_limit);
        sequencer.select(preset)?;

        Ok(Self {
            clock,
            presets: catalog.all().to_vec(),
            selected,
            sequencer,
            metronome: None,
            tick_interval,
            outcomes: Vec::new(),
            status: Some("enter:start | space:pause | ?:help".to_string()),
            should_quit: false,
        })
    }

    #[must_use]
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    #[must_use]
    pub const fn sequencer(&self) -> &PhaseSequencer<C> {
        &self.sequencer
    }

    #[must_use]
    pub fn outcomes(&self) -> &[StopOutcome] {
        &self.outcomes
    }

    /// Sessions ended while the app was open, oldest first.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<StopOutcome> {
        self.outcomes
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sequencer.state().is_running()
    }

    /// Start the highlighted preset from its first phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset cannot be sequenced.
    pub fn start_selected(&mut self) -> Result<(), BreatheError> {
        let Some(preset) = self.presets.get(self.selected).cloned() else {
            return Ok(());
        };
        let title = preset.title.clone();
        self.sequencer.start(preset)?;
        self.arm()?;
        self.status = Some(format!("Started: {title}"));
        Ok(())
    }

    /// Pause or resume. Resuming a fresh selection starts it.
    ///
    /// # Errors
    ///
    /// Returns an error if the metronome cannot be armed.
    pub fn toggle_pause(&mut self) -> Result<(), BreatheError> {
        if self.sequencer.toggle_pause() {
            self.arm()?;
            self.status = Some("Running".to_string());
        } else {
            self.metronome = None;
            self.status = Some("Paused".to_string());
        }
        Ok(())
    }

    /// Stop and record the current session.
    pub fn stop(&mut self) {
        self.metronome = None;
        if let Some(outcome) = self.sequencer.stop() {
            self.status = Some(describe(&outcome));
            self.outcomes.push(outcome);
        }
    }

    /// Back to the first phase, recording nothing.
    pub fn reset(&mut self) {
        self.metronome = None;
        self.sequencer.reset();
        self.status = Some("Reset".to_string());
    }

    /// Move selection up.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset cannot be sequenced.
    pub fn select_previous(&mut self) -> Result<(), BreatheError> {
        if self.selected > 0 {
            self.select(self.selected - 1)?;
        }
        Ok(())
    }

    /// Move selection down.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset cannot be sequenced.
    pub fn select_next(&mut self) -> Result<(), BreatheError> {
        if self.selected + 1 < self.presets.len() {
            self.select(self.selected + 1)?;
        }
        Ok(())
    }

    fn select(&mut self, index: usize) -> Result<(), BreatheError> {
        let Some(preset) = self.presets.get(index).cloned() else {
            return Ok(());
        };
        let switching = self.sequencer.state().active_preset() != Some(&preset);
        let stopped = self.sequencer.select(preset)?;
        // A different preset ends whatever was running.
        if switching {
            self.metronome = None;
        }
        if let Some(outcome) = stopped {
            self.outcomes.push(outcome);
        }
        self.selected = index;
        self.status = None;
        Ok(())
    }

    /// Feed every tick that has come due into the sequencer.
    ///
    /// Returns the number of ticks applied.
    pub fn apply_due_ticks(&mut self) -> u64 {
        let Some(metronome) = self.metronome.as_mut() else {
            return 0;
        };
        let due = metronome.due_ticks();

        let mut applied = 0;
        for _ in 0..due {
            applied += 1;
            if let TickOutcome::SessionComplete(outcome) = self.sequencer.tick() {
                self.metronome = None;
                self.status = Some(describe(&outcome));
                self.outcomes.push(outcome);
                break;
            }
        }
        if applied > 1 {
            debug!(applied, "caught up on late ticks");
        }
        applied
    }

    /// How long the event loop may block waiting for input.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.metronome
            .as_ref()
            .and_then(Metronome::until_next)
            .map_or(IDLE_POLL, |next| next.min(IDLE_POLL))
    }

    /// Carry out a key action.
    ///
    /// # Errors
    ///
    /// Returns an error if a preset cannot be sequenced or the metronome
    /// cannot be armed.
    pub fn handle(&mut self, action: Action) -> Result<(), BreatheError> {
        match action {
            Action::Quit => self.quit(),
            Action::Start => self.start_selected()?,
            Action::TogglePause => self.toggle_pause()?,
            Action::Stop => self.stop(),
            Action::Reset => self.reset(),
            Action::Next => self.select_next()?,
            Action::Previous => self.select_previous()?,
            Action::Help => self.status = Some(HELP.to_string()),
        }
        Ok(())
    }

    /// Stop (recording any session) and leave.
    pub fn quit(&mut self) {
        self.stop();
        self.should_quit = true;
    }

    fn arm(&mut self) -> Result<(), BreatheError> {
        self.metronome = Some(Metronome::new(self.clock.clone(), self.tick_interval)?);
        Ok(())
    }
}

fn describe(outcome: &StopOutcome) -> String {
    match &outcome.recorder_error {
        None => format!(
            "Recorded {}s of {}",
            outcome.record.duration_seconds, outcome.record.preset_id
        ),
        Some(err) => format!("Session not saved: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::core::ManualClock;
    use crate::features::breathing::SessionRecord;

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<SessionRecord>>>);

    impl SessionRecorder for Sink {
        fn record(&mut self, record: &SessionRecord) -> Result<(), BreatheError> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn setup(limit: Option<u64>) -> (ManualClock, Sink, App<ManualClock>) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 2, 6, 0, 0).unwrap());
        let sink = Sink::default();
        let app = App::new(
            clock.clone(),
            &PresetCatalog::builtin(),
            "box",
            Box::new(sink.clone()),
            limit,
            Duration::from_secs(1),
        )
        .unwrap();
        (clock, sink, app)
    }

    fn phase(app: &App<ManualClock>) -> (String, u32) {
        let view = app.sequencer().current_view().unwrap();
        (view.name, view.remaining_seconds)
    }

    #[test]
    fn test_new_selects_without_starting() {
        let (_, _, app) = setup(None);
        assert_eq!(app.selected, 0);
        assert!(!app.is_running());
        assert_eq!(phase(&app), ("inhale".to_string(), 4));
        assert_eq!(app.poll_timeout(), IDLE_POLL);
    }

    #[test]
    fn test_unknown_initial_preset() {
        let result = App::new(
            ManualClock::default(),
            &PresetCatalog::builtin(),
            "nope",
            Box::new(crate::features::breathing::NullRecorder),
            None,
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(BreatheError::NotFound(_))));
    }

    #[test]
    fn test_ticks_follow_clock() {
        let (clock, _, mut app) = setup(None);
        app.start_selected().unwrap();

        clock.advance_secs(1);
        assert_eq!(app.apply_due_ticks(), 1);
        assert_eq!(phase(&app), ("inhale".to_string(), 3));

        // A late wake-up catches up on every missed tick.
        clock.advance_secs(3);
        assert_eq!(app.apply_due_ticks(), 3);
        assert_eq!(phase(&app), ("hold".to_string(), 4));

        assert_eq!(app.apply_due_ticks(), 0);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let (clock, _, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance_secs(2);
        app.apply_due_ticks();

        app.toggle_pause().unwrap();
        clock.advance_secs(10);
        assert_eq!(app.apply_due_ticks(), 0);
        assert_eq!(phase(&app), ("inhale".to_string(), 2));

        app.toggle_pause().unwrap();
        clock.advance_secs(1);
        assert_eq!(app.apply_due_ticks(), 1);
        assert_eq!(phase(&app), ("inhale".to_string(), 1));
    }

    #[test]
    fn test_space_on_fresh_selection_starts() {
        let (clock, sink, mut app) = setup(None);
        app.toggle_pause().unwrap();
        assert!(app.is_running());

        clock.advance_secs(5);
        app.apply_due_ticks();
        app.stop();

        let records = sink.0.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration_seconds, 5);
    }

    #[test]
    fn test_limit_completes_session() {
        let (clock, sink, mut app) = setup(Some(10));
        app.start_selected().unwrap();

        clock.advance_secs(15);
        assert_eq!(app.apply_due_ticks(), 10);
        assert!(!app.is_running());
        assert_eq!(app.outcomes().len(), 1);
        assert_eq!(app.poll_timeout(), IDLE_POLL);

        let records = sink.0.lock().unwrap();
        assert!(records[0].completed);
    }

    #[test]
    fn test_switching_preset_records_running_session() {
        let (clock, sink, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance_secs(8);
        app.apply_due_ticks();

        app.select_next().unwrap();

        assert_eq!(app.selected, 1);
        assert!(!app.is_running());
        assert_eq!(phase(&app), ("inhale".to_string(), 4));
        assert_eq!(sink.0.lock().unwrap()[0].preset_id, "box-breathing");
    }

    #[test]
    fn test_selection_bounds() {
        let (_, _, mut app) = setup(None);
        app.select_previous().unwrap();
        assert_eq!(app.selected, 0);
        for _ in 0..10 {
            app.select_next().unwrap();
        }
        assert_eq!(app.selected, app.presets().len() - 1);
    }

    #[test]
    fn test_reset_records_nothing() {
        let (clock, sink, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance_secs(6);
        app.apply_due_ticks();

        app.reset();
        app.quit();

        assert!(app.should_quit);
        assert!(sink.0.lock().unwrap().is_empty());
        assert!(app.into_outcomes().is_empty());
    }

    #[test]
    fn test_quit_records_running_session() {
        let (clock, sink, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance_secs(30);
        app.apply_due_ticks();

        app.quit();

        assert!(app.should_quit);
        assert_eq!(sink.0.lock().unwrap()[0].duration_seconds, 30);
    }

    #[test]
    fn test_handle_actions() {
        let (clock, sink, mut app) = setup(None);
        app.handle(Action::Next).unwrap();
        app.handle(Action::Start).unwrap();
        clock.advance_secs(4);
        app.apply_due_ticks();
        assert_eq!(phase(&app), ("hold".to_string(), 7));

        app.handle(Action::Help).unwrap();
        assert!(app.status.as_deref().unwrap().contains("q:quit"));

        app.handle(Action::Quit).unwrap();
        assert!(app.should_quit);
        assert_eq!(sink.0.lock().unwrap()[0].preset_id, "calm-breathing");
    }

    #[test]
    fn test_poll_timeout_tracks_next_tick() {
        let (clock, _, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance(chrono::Duration::milliseconds(900));
        assert_eq!(app.poll_timeout(), Duration::from_millis(100));
    }

    #[test]
    fn test_wall_clock_step_back_keeps_ticking() {
        let (clock, _, mut app) = setup(None);
        app.start_selected().unwrap();
        clock.advance_secs(2);
        assert_eq!(app.apply_due_ticks(), 2);

        clock.advance_secs(-3600);
        let mut applied = 0;
        for _ in 0..120 {
            clock.advance_secs(1);
            applied += app.apply_due_ticks();
        }

        assert_eq!(applied, 120);
        assert_eq!(app.sequencer().state().ticks_elapsed(), 122);
    }

    #[test]
    fn test_huge_tick_interval_waits_idle() {
        let clock = ManualClock::default();
        let mut app = App::new(
            clock.clone(),
            &PresetCatalog::builtin(),
            "box",
            Box::new(crate::features::breathing::NullRecorder),
            None,
            Duration::from_millis(9_000_000_000_000_000),
        )
        .unwrap();
        app.start_selected().unwrap();

        assert_eq!(app.poll_timeout(), IDLE_POLL);
        clock.advance_secs(60);
        assert_eq!(app.apply_due_ticks(), 0);
        assert_eq!(app.poll_timeout(), IDLE_POLL);
    }

    #[test]
    fn test_selecting_identical_preset_keeps_ticking() {
        let (clock, sink, mut app) = setup(None);
        let twin = app.presets[0].clone();
        app.presets.insert(1, twin);
        app.start_selected().unwrap();
        clock.advance_secs(2);
        app.apply_due_ticks();

        app.select_next().unwrap();
        assert_eq!(app.selected, 1);
        assert!(app.is_running());

        clock.advance_secs(1);
        assert_eq!(app.apply_due_ticks(), 1);
        assert_eq!(phase(&app), ("inhale".to_string(), 1));
        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_preset_leaves_session_ticking() {
        let (clock, sink, mut app) = setup(None);
        let mut broken = app.presets[1].clone();
        broken.id = "broken".to_string();
        broken.phases.clear();
        app.presets.insert(1, broken);
        app.start_selected().unwrap();
        clock.advance_secs(1);
        app.apply_due_ticks();

        let err = app.select_next().unwrap_err();
        assert!(matches!(err, BreatheError::Validation(_)));
        assert_eq!(app.selected, 0);
        assert!(app.is_running());

        clock.advance_secs(1);
        assert_eq!(app.apply_due_ticks(), 1);
        assert_eq!(phase(&app), ("inhale".to_string(), 2));
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
