//! Session recording.
//!
//! When a session ends the sequencer hands a [`SessionRecord`] to a
//! [`SessionRecorder`]. Where the record goes, and whose it is, is up to
//! the recorder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BreatheError;

/// One finished breathing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Preset that was running
    pub preset_id: String,
    /// When the session was started
    pub started_at: DateTime<Utc>,
    /// When the session was stopped
    pub ended_at: DateTime<Utc>,
    /// Real elapsed time in whole seconds, paused time included
    pub duration_seconds: u64,
    /// Whether the session ran to its configured limit (always true for
    /// open-ended sessions)
    pub completed: bool,
}

/// Destination for finished sessions.
#[cfg_attr(test, mockall::automock)]
pub trait SessionRecorder {
    /// Persist a finished session.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be stored.
    fn record(&mut self, record: &SessionRecord) -> Result<(), BreatheError>;
}

/// Recorder that drops everything, for `--no-record` runs and previews.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl SessionRecorder for NullRecorder {
    fn record(&mut self, _record: &SessionRecord) -> Result<(), BreatheError> {
        Ok(())
    }
}
