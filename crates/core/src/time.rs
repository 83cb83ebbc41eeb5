use chrono::{DateTime, Duration, Utc};

/// Source of "now" for exam sessions.
///
/// Sessions never read the system time directly; hosts pass timestamps taken
/// from a `Clock`, and tests pin it with `Clock::Fixed` so deadlines can be
/// crossed without waiting.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Wall-clock time, used by the terminal host.
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    /// Stays at `at` until moved with [`Clock::advance`].
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Steps a pinned clock by `delta`, e.g. past an exam deadline.
    ///
    /// `Clock::System` ignores it.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Unix seconds of the instant every test exam starts at (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// [`FIXED_TEST_TIMESTAMP`] as a `DateTime<Utc>`.
///
/// # Panics
///
/// Never in practice; the constant is well inside chrono's range.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("FIXED_TEST_TIMESTAMP is in range")
}

/// `Clock::Fixed` at [`fixed_now`].
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
