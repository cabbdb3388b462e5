use chrono::{DateTime, Days, TimeZone};

pub const MAX_CACHE_AGE_DAYS: u64 = 7;

/// Decides whether a cached feed is still usable.
///
/// The age limit is counted in calendar days in the timestamp's own time zone, so a window that
/// crosses a daylight saving change ends at the same wall-clock time it started rather than after
/// a fixed number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCachePolicy {
    max_age_days: u64,
}

impl Default for FeedCachePolicy {
    fn default() -> Self {
        Self {
            max_age_days: MAX_CACHE_AGE_DAYS,
        }
    }
}

impl FeedCachePolicy {
    pub fn with_max_age_days(max_age_days: u64) -> Self {
        Self { max_age_days }
    }

    pub fn max_age_days(&self) -> u64 {
        self.max_age_days
    }

    /// True iff `against` falls strictly before `timestamp` plus the max age. A timestamp whose
    /// expiry cannot be represented is treated as invalid.
    pub fn validate<Tz: TimeZone>(&self, timestamp: &DateTime<Tz>, against: &DateTime<Tz>) -> bool {
        match timestamp
            .clone()
            .checked_add_days(Days::new(self.max_age_days))
        {
            Some(max_age) => against < &max_age,
            None => false,
        }
    }
}
