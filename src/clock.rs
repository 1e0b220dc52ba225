use chrono::{DateTime, Duration, Utc};

/// Source of "now" for anything that stamps or classifies by time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Look-back window of `days`, saturating instead of overflowing
pub fn window_days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(Duration::MAX)
}

/// Start of a look-back window ending at `now`; clamps to the earliest
/// representable instant when the window reaches past it
pub fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
