//! Phase sequencing for guided breathing.
//!
//! [`PhaseSequencer`] owns a single [`SessionState`] and moves it through a
//! preset's phases one tick at a time. It never reads a timer itself: the
//! caller decides when a tick happens, and the time source is injected, so
//! the whole cycle can be exercised without waiting.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::preset::{Phase, Preset};
use super::recorder::{SessionRecord, SessionRecorder};
use crate::core::Clock;
use crate::error::BreatheError;

/// Where a breathing session currently is.
///
/// Only [`PhaseSequencer`] can change it. Whenever a preset is active,
/// `current_phase_index` points into its phases and `remaining_seconds`
/// lies within that phase's duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    active_preset: Option<Preset>,
    current_phase_index: usize,
    remaining_seconds: u32,
    running: bool,
    started_at: Option<DateTime<Utc>>,
    started_mono: Option<Duration>,
    ticks_elapsed: u64,
    cycles_completed: u64,
}

impl SessionState {
    fn selected(preset: Preset) -> Self {
        let remaining_seconds = preset.phases.first().map_or(0, |p| p.duration_seconds);
        Self {
            active_preset: Some(preset),
            remaining_seconds,
            ..Self::default()
        }
    }

    /// Back to phase 0 at full duration, not running, nothing started.
    fn rewind(&mut self) {
        self.current_phase_index = 0;
        self.remaining_seconds = self
            .active_preset
            .as_ref()
            .and_then(|p| p.phases.first())
            .map_or(0, |p| p.duration_seconds);
        self.running = false;
        self.started_at = None;
        self.started_mono = None;
        self.ticks_elapsed = 0;
        self.cycles_completed = 0;
    }

    #[must_use]
    pub const fn active_preset(&self) -> Option<&Preset> {
        self.active_preset.as_ref()
    }

    #[must_use]
    pub const fn current_phase_index(&self) -> usize {
        self.current_phase_index
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Ticks delivered while running since the session started.
    #[must_use]
    pub const fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Full passes through the phase list since the session started.
    #[must_use]
    pub const fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// The phase the index points at.
    #[must_use]
    pub fn current_phase(&self) -> Option<&Phase> {
        self.active_preset
            .as_ref()
            .and_then(|p| p.phases.get(self.current_phase_index))
    }
}

/// What a display surface needs to draw the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseView {
    pub name: String,
    pub instruction: String,
    pub remaining_seconds: u32,
}

impl PhaseView {
    /// `(name, instruction, remaining_seconds)`
    #[must_use]
    pub fn as_tuple(&self) -> (&str, &str, u32) {
        (&self.name, &self.instruction, self.remaining_seconds)
    }
}

/// Result of ending a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopOutcome {
    /// What was handed to the recorder
    pub record: SessionRecord,
    /// Set if the recorder rejected the record
    pub recorder_error: Option<String>,
}

impl StopOutcome {
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        self.recorder_error.is_none()
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// Counted down within the current phase
    Counted,
    /// Moved on to the phase at `index`
    PhaseChanged { index: usize },
    /// The session limit was reached and the session was stopped
    SessionComplete(StopOutcome),
}

/// Drives a breathing session through its phase cycle.
pub struct PhaseSequencer<C: Clock> {
    clock: C,
    recorder: Box<dyn SessionRecorder>,
    session_limit_seconds: Option<u64>,
    state: SessionState,
}

impl<C: Clock> PhaseSequencer<C> {
    /// Create an idle sequencer with no preset selected.
    pub fn new(clock: C, recorder: Box<dyn SessionRecorder>) -> Self {
        Self {
            clock,
            recorder,
            session_limit_seconds: None,
            state: SessionState::default(),
        }
    }

    /// Stop sessions automatically after `limit` running seconds.
    #[must_use]
    pub fn with_session_limit(mut self, limit: Option<u64>) -> Self {
        self.set_session_limit(limit);
        self
    }

    /// Change the session limit. `Some(0)` is treated as no limit.
    pub fn set_session_limit(&mut self, limit: Option<u64>) {
        self.session_limit_seconds = limit.filter(|&secs| secs > 0);
    }

    #[must_use]
    pub const fn session_limit(&self) -> Option<u64> {
        self.session_limit_seconds
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Make `preset` active without starting it.
    ///
    /// Choosing a different preset ends (and records) any session in
    /// progress. Choosing the preset that is already active changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if the preset cannot be sequenced;
    /// the current state is left as it was.
    pub fn select(&mut self, preset: Preset) -> Result<Option<StopOutcome>, BreatheError> {
        preset.validate()?;

        if self.state.active_preset.as_ref() == Some(&preset) {
            return Ok(None);
        }

        let outcome = self.stop();
        debug!(preset = %preset.id, "preset selected");
        self.state = SessionState::selected(preset);
        Ok(outcome)
    }

    /// Start `preset` from its first phase.
    ///
    /// Starting while a session is already running begins again from phase
    /// 0; the unfinished run is discarded, not recorded.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if the preset cannot be sequenced;
    /// the current state is left as it was.
    pub fn start(&mut self, preset: Preset) -> Result<(), BreatheError> {
        preset.validate()?;

        if self.state.started_at.is_some() {
            debug!("restarting; unfinished session discarded");
        }

        let started_at = self.clock.now();
        let started_mono = self.clock.monotonic();
        info!(preset = %preset.id, phases = preset.phases.len(), "breathing session started");

        self.state = SessionState::selected(preset);
        self.state.running = true;
        self.state.started_at = Some(started_at);
        self.state.started_mono = Some(started_mono);
        Ok(())
    }

    /// Advance one second.
    ///
    /// Has no effect unless the session is running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }
        let Some(phase_count) = self.state.active_preset.as_ref().map(|p| p.phases.len()) else {
            return TickOutcome::Idle;
        };

        self.state.ticks_elapsed += 1;
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);

        let outcome = if self.state.remaining_seconds == 0 {
            let next = (self.state.current_phase_index + 1) % phase_count;
            if next == 0 {
                self.state.cycles_completed += 1;
            }
            self.state.current_phase_index = next;
            self.state.remaining_seconds = self
                .state
                .current_phase()
                .map_or(0, |p| p.duration_seconds);
            debug!(
                index = next,
                phase = self.state.current_phase().map_or("", |p| p.name.as_str()),
                "phase changed"
            );
            TickOutcome::PhaseChanged { index: next }
        } else {
            TickOutcome::Counted
        };

        if let Some(limit) = self.session_limit_seconds {
            if self.state.ticks_elapsed >= limit {
                info!(limit, "session limit reached");
                if let Some(stopped) = self.finish(true) {
                    return TickOutcome::SessionComplete(stopped);
                }
            }
        }

        outcome
    }

    /// Pause a running session or resume a paused one.
    ///
    /// Returns whether the session is running afterwards. Does nothing when
    /// no preset is active. Resuming a session that was reset or stopped
    /// starts its clock again from now.
    pub fn toggle_pause(&mut self) -> bool {
        if self.state.active_preset.is_none() {
            return false;
        }

        self.state.running = !self.state.running;
        if self.state.running && self.state.started_at.is_none() {
            self.state.started_at = Some(self.clock.now());
            self.state.started_mono = Some(self.clock.monotonic());
        }
        debug!(running = self.state.running, "pause toggled");
        self.state.running
    }

    /// End the session and hand its elapsed time to the recorder.
    ///
    /// The state always returns to phase 0 at full duration, whether or not
    /// the recorder accepts the record. Returns `None` if no session had
    /// been started.
    pub fn stop(&mut self) -> Option<StopOutcome> {
        // Open-ended sessions have no limit to fall short of.
        let completed = self.session_limit_seconds.is_none();
        self.finish(completed)
    }

    /// Return to phase 0 without recording anything.
    pub fn reset(&mut self) {
        self.state.rewind();
    }

    /// The active phase, or `None` if no preset is selected.
    #[must_use]
    pub fn current_view(&self) -> Option<PhaseView> {
        self.state.current_phase().map(|phase| PhaseView {
            name: phase.name.clone(),
            instruction: phase.instruction.clone(),
            remaining_seconds: self.state.remaining_seconds,
        })
    }

    /// Fraction of the current phase already done (0.0 - 1.0).
    #[must_use]
    pub fn phase_progress(&self) -> f64 {
        match self.state.current_phase() {
            Some(phase) if phase.duration_seconds > 0 => {
                let done = phase.duration_seconds - self.state.remaining_seconds.min(phase.duration_seconds);
                f64::from(done) / f64::from(phase.duration_seconds)
            }
            _ => 0.0,
        }
    }

    /// Real time since the session started, paused time included.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.state
            .started_mono
            .map_or(Duration::ZERO, |started| self.clock.monotonic().saturating_sub(started))
    }

    /// Running seconds left before the session limit stops the session.
    #[must_use]
    pub fn remaining_session_seconds(&self) -> Option<u64> {
        self.session_limit_seconds
            .map(|limit| limit.saturating_sub(self.state.ticks_elapsed))
    }

    fn finish(&mut self, completed: bool) -> Option<StopOutcome> {
        let started_at = self.state.started_at;
        let elapsed = self.elapsed();
        let preset_id = self.state.active_preset.as_ref().map(|p| p.id.clone());
        self.state.rewind();

        let (Some(started_at), Some(preset_id)) = (started_at, preset_id) else {
            return None;
        };

        let ended_at = self.clock.now();
        let record = SessionRecord {
            preset_id,
            started_at,
            ended_at,
            duration_seconds: elapsed.as_secs(),
            completed,
        };

        let recorder_error = match self.recorder.record(&record) {
            Ok(()) => {
                info!(
                    preset = %record.preset_id,
                    seconds = record.duration_seconds,
                    completed,
                    "breathing session recorded"
                );
                None
            }
            Err(e) => {
                warn!(preset = %record.preset_id, error = %e, "failed to record breathing session");
                Some(e.to_string())
            }
        };

        Some(StopOutcome {
            record,
            recorder_error,
        })
    }
}

impl<C: Clock> std::fmt::Debug for PhaseSequencer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseSequencer")
            .field("session_limit_seconds", &self.session_limit_seconds)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
