//! Time sources.
//!
//! Everything that reads the time goes through [`Clock`] so sessions can be
//! driven second by second in tests without sleeping.
//!
//! A clock gives two readings. [`Clock::now`] is the calendar time stamped
//! on records, and it may jump when the system clock is adjusted.
//! [`Clock::monotonic`] only ever moves forward and is what tick scheduling
//! and session lengths are measured with.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;

static PROCESS_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

/// A source of the current time.
pub trait Clock {
    /// The current calendar time.
    fn now(&self) -> DateTime<Utc>;

    /// Time since a fixed origin. Never decreases.
    fn monotonic(&self) -> std::time::Duration;
}

/// The system clock: `Utc::now` for timestamps, `Instant` for spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> std::time::Duration {
        PROCESS_ORIGIN.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same readings, so a test can hand one copy to a
/// sequencer and keep another to advance time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
    monotonic: Rc<Cell<std::time::Duration>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
            monotonic: Rc::new(Cell::new(std::time::Duration::ZERO)),
        }
    }

    /// Let time pass.
    ///
    /// A negative duration steps the calendar time back, the way an NTP
    /// correction would, and leaves the monotonic reading where it is.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
        if let Ok(forward) = by.to_std() {
            self.monotonic.set(self.monotonic.get().saturating_add(forward));
        }
    }

    /// [`advance`](Self::advance) by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    /// Adjust only the calendar time, as if someone reset the system clock.
    pub fn step_wall(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump the calendar time to an absolute instant. The monotonic
    /// reading is unchanged.
    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn monotonic(&self) -> std::time::Duration {
        self.monotonic.get()
    }
}
