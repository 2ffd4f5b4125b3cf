//! Core abstractions for breathe.
//!
//! Time sources and duration helpers shared across features.

mod clock;
mod duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use duration::{format_mmss, format_seconds, parse_duration, render_progress_bar};
