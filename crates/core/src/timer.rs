//! Countdown for an exam attempt.
//!
//! A `Timer` is only a start timestamp plus an optional limit; every query takes
//! `now` explicitly, so ticking it from a polling loop is a pure read.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::model::TimeLimit;

/// Time left on an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unlimited,
    Finite(Duration),
}

impl Remaining {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Remaining::Finite(d) if *d <= Duration::zero())
    }

    /// Whole seconds left, `None` when unlimited.
    #[must_use]
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Remaining::Unlimited => None,
            Remaining::Finite(d) => Some(d.num_seconds()),
        }
    }
}

impl fmt::Display for Remaining {
    /// `MM:SS` (minutes may exceed 59), or `unlimited`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seconds() {
            None => f.write_str("unlimited"),
            Some(secs) => write!(f, "{:02}:{:02}", secs / 60, secs % 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    started_at: DateTime<Utc>,
    limit: Option<Duration>,
}

impl Timer {
    #[must_use]
    pub fn start(started_at: DateTime<Utc>, limit: TimeLimit) -> Self {
        Self {
            started_at,
            limit: limit.duration(),
        }
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.limit.map(|limit| self.started_at + limit)
    }

    /// Time since start; zero if `now` precedes the start.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.started_at).max(Duration::zero())
    }

    /// Time left at `now`, clamped at zero.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        match self.deadline() {
            None => Remaining::Unlimited,
            Some(deadline) => Remaining::Finite((deadline - now).max(Duration::zero())),
        }
    }

    /// True iff a finite limit was set and it has run out at `now`.
    #[must_use]
    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn unlimited_timer_never_expires() {
        let timer = Timer::start(fixed_now(), TimeLimit::Unlimited);
        let later = fixed_now() + Duration::days(30);
        assert_eq!(timer.remaining(later), Remaining::Unlimited);
        assert!(!timer.expired(later));
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn remaining_counts_down_and_clamps_at_zero() {
        let timer = Timer::start(fixed_now(), TimeLimit::Minutes15);
        let remaining = timer.remaining(fixed_now() + Duration::minutes(5));
        assert_eq!(remaining, Remaining::Finite(Duration::minutes(10)));
        assert!(!timer.expired(fixed_now() + Duration::minutes(5)));

        let late = fixed_now() + Duration::hours(2);
        assert_eq!(timer.remaining(late), Remaining::Finite(Duration::zero()));
        assert!(timer.expired(late));
    }

    #[test]
    fn expires_exactly_at_deadline() {
        let timer = Timer::start(fixed_now(), TimeLimit::custom(1).unwrap());
        assert!(!timer.expired(fixed_now()));
        assert!(timer.expired(fixed_now() + Duration::seconds(1)));
    }

    #[test]
    fn clock_skew_before_start_is_not_negative_elapsed() {
        let timer = Timer::start(fixed_now(), TimeLimit::Minutes30);
        let before = fixed_now() - Duration::seconds(10);
        assert_eq!(timer.elapsed(before), Duration::zero());
        assert_eq!(
            timer.remaining(before),
            Remaining::Finite(Duration::minutes(30) + Duration::seconds(10))
        );
    }

    #[test]
    fn remaining_formats_as_minutes_and_seconds() {
        assert_eq!(Remaining::Finite(Duration::seconds(125)).to_string(), "02:05");
        assert_eq!(Remaining::Finite(Duration::minutes(60)).to_string(), "60:00");
        assert_eq!(Remaining::Unlimited.to_string(), "unlimited");
    }
}
