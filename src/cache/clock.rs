use chrono::{DateTime, Duration, Utc};
#[cfg(test)]
use std::sync::{Mutex, PoisonError};

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Converts a configured window in seconds, saturating instead of overflowing.
pub fn ttl_from_secs(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// An entry stamped in the future (clock skew, restored file) is stale.
pub fn is_within_window(age: Duration, ttl: Duration) -> bool {
    age >= Duration::zero() && age < ttl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_excludes_negative_and_expired_ages() {
        let ttl = Duration::seconds(3600);
        assert!(is_within_window(Duration::zero(), ttl));
        assert!(is_within_window(Duration::seconds(3599), ttl));
        assert!(!is_within_window(Duration::seconds(3600), ttl));
        assert!(!is_within_window(Duration::seconds(-1), ttl));
    }

    #[test]
    fn ttl_conversion_saturates() {
        assert_eq!(ttl_from_secs(60), Duration::seconds(60));
        assert_eq!(ttl_from_secs(u64::MAX), Duration::MAX);
    }
}
