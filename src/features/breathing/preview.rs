//! Dry-run timelines.
//!
//! Runs a preset through a real [`PhaseSequencer`] on a [`ManualClock`], one
//! second per tick, so the whole phase timeline can be printed instantly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::preset::Preset;
use super::recorder::{NullRecorder, SessionRecord};
use super::sequencer::{PhaseSequencer, TickOutcome};
use crate::core::ManualClock;
use crate::error::BreatheError;

/// Longest timeline `preview` will produce.
pub const MAX_PREVIEW_SECONDS: u64 = 3600;

/// The sequencer's view at one second of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    pub second: u64,
    pub phase_index: usize,
    pub phase: String,
    pub instruction: String,
    pub remaining_seconds: u32,
    pub cycle: u64,
}

/// A preset played out second by second.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub preset_id: String,
    pub title: String,
    pub seconds: u64,
    pub session_limit_seconds: Option<u64>,
    /// Row 0 is the state right after starting
    pub rows: Vec<TimelineRow>,
    /// What a real session of this length would record
    pub summary: Option<SessionRecord>,
}

/// Play `preset` for `seconds` ticks starting at `start`.
///
/// With a session limit shorter than `seconds`, the timeline ends where the
/// limit stops the session.
///
/// # Errors
///
/// Returns `BreatheError::Validation` if the preset is malformed or
/// `seconds` exceeds [`MAX_PREVIEW_SECONDS`].
pub fn preview(
    preset: &Preset,
    seconds: u64,
    session_limit: Option<u64>,
    start: DateTime<Utc>,
) -> Result<Timeline, BreatheError> {
    if seconds > MAX_PREVIEW_SECONDS {
        return Err(BreatheError::Validation(format!(
            "preview length {seconds}s exceeds the maximum of {MAX_PREVIEW_SECONDS}s"
        )));
    }

    let clock = ManualClock::new(start);
    let mut sequencer = PhaseSequencer::new(clock.clone(), Box::new(NullRecorder))
        .with_session_limit(session_limit);
    sequencer.start(preset.clone())?;

    let mut rows = Vec::new();
    rows.extend(row(0, &sequencer));

    let mut summary = None;
    for second in 1..=seconds {
        clock.advance_secs(1);
        if let TickOutcome::SessionComplete(outcome) = sequencer.tick() {
            summary = Some(outcome.record);
            break;
        }
        rows.extend(row(second, &sequencer));
    }

    let summary = summary.or_else(|| sequencer.stop().map(|outcome| outcome.record));

    Ok(Timeline {
        preset_id: preset.id.clone(),
        title: preset.title.clone(),
        seconds,
        session_limit_seconds: sequencer.session_limit(),
        rows,
        summary,
    })
}

fn row(second: u64, sequencer: &PhaseSequencer<ManualClock>) -> Option<TimelineRow> {
    let view = sequencer.current_view()?;
    let state = sequencer.state();
    Some(TimelineRow {
        second,
        phase_index: state.current_phase_index(),
        phase: view.name,
        instruction: view.instruction,
        remaining_seconds: view.remaining_seconds,
        cycle: state.cycles_completed(),
    })
}
