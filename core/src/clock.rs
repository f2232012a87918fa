use chrono::{DateTime, TimeDelta, Utc};
use core::cell::Cell;

/// Wall-clock source injected into the game so timing stays deterministic under test.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// A clock that only moves when told to.
#[derive(Clone, Debug, PartialEq)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + TimeDelta::seconds(secs));
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Whole seconds from `start` to `end`, clamped to zero when the clock went backwards.
pub fn elapsed_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
    let secs = end.signed_duration_since(start).num_seconds().max(0);
    u32::try_from(secs).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(at(1_000));
        clock.advance_secs(42);
        assert_eq!(clock.now(), at(1_042));
    }

    #[test]
    fn closures_are_clocks() {
        let clock = || at(5);
        assert_eq!(Clock::now(&clock), at(5));
    }

    #[test]
    fn elapsed_never_goes_negative() {
        assert_eq!(elapsed_secs(at(10), at(25)), 15);
        assert_eq!(elapsed_secs(at(25), at(10)), 0);
    }
}
