//! Guided breathing sessions.
//!
//! - Presets: named, cyclic phase patterns (box, 4-7-8, ...)
//! - Sequencer: walks a session through the phases one tick at a time
//! - Metronome: decides when ticks are due
//! - Preview: a preset's timeline without waiting
//! - Recording, storage and reports for finished sessions

pub mod metronome;
pub mod preset;
pub mod preview;
pub mod recorder;
pub mod report;
pub mod sequencer;
pub mod storage;

pub use metronome::Metronome;
pub use preset::{
    Phase, Preset, PresetCatalog, BREATHING_TIPS, BUILTIN_PRESETS, QUICK_PRESET_ID,
};
pub use preview::{preview, Timeline, TimelineRow, MAX_PREVIEW_SECONDS};
pub use recorder::{NullRecorder, SessionRecord, SessionRecorder};
pub use report::{PracticeReport, ReportPeriod};
pub use sequencer::{PhaseSequencer, PhaseView, SessionState, StopOutcome, TickOutcome};
pub use storage::{SessionStorage, StoredSession};
