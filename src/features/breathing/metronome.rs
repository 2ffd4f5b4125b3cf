//! Fixed-interval tick scheduling.
//!
//! A [`Metronome`] is armed when it is created and disarmed when it is
//! cancelled or dropped. The event loop asks it how many ticks are due and
//! how long to wait for the next one. Due ticks are counted from the
//! instant the metronome was armed, so a late wake-up delivers every missed
//! tick exactly once instead of drifting. All readings come from
//! [`Clock::monotonic`], so changes to the system clock do not affect the
//! cadence.

use std::time::Duration;

use tracing::trace;

use crate::core::Clock;
use crate::error::BreatheError;

/// A cancellable source of evenly spaced ticks.
#[derive(Debug)]
pub struct Metronome<C: Clock> {
    clock: C,
    interval: Duration,
    armed_at: Option<Duration>,
    delivered: u64,
}

impl<C: Clock> Metronome<C> {
    /// Arm a metronome that ticks every `interval`, starting now.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if the interval is zero.
    pub fn new(clock: C, interval: Duration) -> Result<Self, BreatheError> {
        if interval.is_zero() {
            return Err(BreatheError::Validation(
                "tick interval must be greater than zero".to_string(),
            ));
        }

        let armed_at = clock.monotonic();
        trace!(interval = ?interval, "metronome armed");
        Ok(Self {
            clock,
            interval,
            armed_at: Some(armed_at),
            delivered: 0,
        })
    }

    /// Ticks that have come due since the last call. Always 0 once
    /// cancelled.
    pub fn due_ticks(&mut self) -> u64 {
        let Some(elapsed) = self.elapsed() else {
            return 0;
        };
        let total = elapsed.as_nanos() / self.interval.as_nanos();
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        let due = total.saturating_sub(self.delivered);
        self.delivered = self.delivered.max(total);
        due
    }

    /// Time left until the next tick, or `None` once cancelled.
    ///
    /// A deadline too far away to represent saturates at `Duration::MAX`.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        let elapsed = self.elapsed()?;
        let next = self
            .interval
            .as_nanos()
            .saturating_mul(u128::from(self.delivered.saturating_add(1)));
        let wait = next.saturating_sub(elapsed.as_nanos());
        Some(saturating_from_nanos(wait))
    }

    /// Stop ticking. Idempotent.
    pub fn cancel(&mut self) {
        if self.armed_at.take().is_some() {
            trace!(delivered = self.delivered, "metronome cancelled");
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    /// Ticks handed out so far.
    #[must_use]
    pub const fn delivered(&self) -> u64 {
        self.delivered
    }

    fn elapsed(&self) -> Option<Duration> {
        let armed_at = self.armed_at?;
        Some(self.clock.monotonic().saturating_sub(armed_at))
    }
}

impl<C: Clock> Drop for Metronome<C> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn saturating_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    u64::try_from(nanos / NANOS_PER_SEC).map_or(Duration::MAX, |secs| {
        Duration::new(secs, u32::try_from(nanos % NANOS_PER_SEC).unwrap_or(0))
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::core::ManualClock;

    const SECOND: Duration = Duration::from_secs(1);

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap())
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Metronome::new(clock(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, BreatheError::Validation(_)));
    }

    #[test]
    fn test_one_tick_per_interval() {
        let clock = clock();
        let mut metronome = Metronome::new(clock.clone(), SECOND).unwrap();

        assert_eq!(metronome.due_ticks(), 0);
        clock.advance(chrono::Duration::milliseconds(999));
        assert_eq!(metronome.due_ticks(), 0);
        clock.advance(chrono::Duration::milliseconds(1));
        assert_eq!(metronome.due_ticks(), 1);
        assert_eq!(metronome.due_ticks(), 0);
    }

    #[test]
    fn test_late_wakeup_delivers_missed_ticks_once() {
        let clock = clock();
        let mut metronome = Metronome::new(clock.clone(), SECOND).unwrap();

        clock.advance(chrono::Duration::milliseconds(3500));
        assert_eq!(metronome.due_ticks(), 3);
        clock.advance(chrono::Duration::milliseconds(500));
        assert_eq!(metronome.due_ticks(), 1);
        assert_eq!(metronome.delivered(), 4);
    }

    #[test]
    fn test_until_next() {
        let clock = clock();
        let mut metronome = Metronome::new(clock.clone(), SECOND).unwrap();

        assert_eq!(metronome.until_next(), Some(SECOND));
        clock.advance(chrono::Duration::milliseconds(1250));
        assert_eq!(metronome.due_ticks(), 1);
        assert_eq!(metronome.until_next(), Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_until_next_is_zero_when_overdue() {
        let clock = clock();
        let metronome = Metronome::new(clock.clone(), SECOND).unwrap();
        clock.advance_secs(5);
        assert_eq!(metronome.until_next(), Some(Duration::ZERO));
    }

    #[test]
    fn test_huge_interval_saturates() {
        let clock = clock();
        let interval = Duration::from_millis(9_000_000_000_000_000);
        let mut metronome = Metronome::new(clock.clone(), interval).unwrap();

        assert_eq!(metronome.until_next(), Some(interval));
        clock.advance_secs(10);
        assert_eq!(metronome.due_ticks(), 0);
        assert!(metronome.until_next().unwrap() < interval);

        let mut slowest = Metronome::new(clock, Duration::MAX).unwrap();
        assert_eq!(slowest.until_next(), Some(Duration::MAX));
        assert_eq!(slowest.due_ticks(), 0);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let clock = clock();
        let mut metronome = Metronome::new(clock.clone(), SECOND).unwrap();
        metronome.cancel();
        metronome.cancel();

        clock.advance_secs(10);
        assert!(!metronome.is_armed());
        assert_eq!(metronome.due_ticks(), 0);
        assert!(metronome.until_next().is_none());
    }

    #[test]
    fn test_wall_clock_steps_keep_cadence() {
        let clock = clock();
        let mut metronome = Metronome::new(clock.clone(), SECOND).unwrap();
        clock.advance_secs(2);
        assert_eq!(metronome.due_ticks(), 2);

        clock.step_wall(chrono::Duration::hours(-1));
        clock.advance_secs(1);
        assert_eq!(metronome.due_ticks(), 1);
        assert_eq!(metronome.until_next(), Some(SECOND));

        clock.step_wall(chrono::Duration::hours(8));
        assert_eq!(metronome.due_ticks(), 0);
        clock.advance_secs(1);
        assert_eq!(metronome.due_ticks(), 1);
        assert_eq!(metronome.delivered(), 4);
    }
}
