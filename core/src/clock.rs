// Time and identifier capabilities
//
// Both are injected into the store so records get deterministic ids and
// timestamps under test.

use chrono::NaiveDate;
#[cfg(any(test, feature = "test-utils"))]
use std::sync::atomic::{AtomicU64, Ordering};
use web_time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for record timestamps and birthday math
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;

    /// The current calendar date in the user's local time zone
    fn today(&self) -> NaiveDate;
}

/// Generates a unique opaque token per record
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[cfg(any(test, feature = "test-utils"))]
/// Clock pinned to a date; each `now_millis` call advances by one millisecond.
#[derive(Debug)]
pub struct FixedClock {
    today: NaiveDate,
    millis: AtomicU64,
}

#[cfg(any(test, feature = "test-utils"))]
impl FixedClock {
    pub fn new(today: NaiveDate, start_millis: u64) -> Self {
        Self {
            today,
            millis: AtomicU64::new(start_millis),
        }
    }

    /// Clock for `today` starting at that day's midnight UTC
    pub fn on(today: NaiveDate) -> Self {
        let start = today
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis().max(0) as u64)
            .unwrap_or(0);
        Self::new(today, start)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis.fetch_add(1, Ordering::SeqCst)
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(any(test, feature = "test-utils"))]
/// Predictable ids: `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

#[cfg(any(test, feature = "test-utils"))]
impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_generator_unique() {
        let ids = UuidGenerator;
        let seen: HashSet<String> = (0..100).map(|_| ids.generate()).collect();
        assert_eq!(seen.len(), 100);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("mem");
        assert_eq!(ids.generate(), "mem-1");
        assert_eq!(ids.generate(), "mem-2");
    }

    #[test]
    fn test_fixed_clock_advances() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let clock = FixedClock::new(today, 1_000);
        assert_eq!(clock.now_millis(), 1_000);
        assert_eq!(clock.now_millis(), 1_001);
        assert_eq!(clock.today(), today);
    }

    #[test]
    fn test_fixed_clock_on_midnight() {
        let today = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let clock = FixedClock::on(today);
        assert_eq!(clock.now_millis(), 86_400_000);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }
}
