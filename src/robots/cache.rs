//! Per-origin robots.txt cache entries

use crate::robots::RobotsRules;
use chrono::{DateTime, Duration, Utc};

/// Entries older than this are fetched again
pub const MAX_AGE_HOURS: i64 = 24;

/// Rules for one origin together with when they were fetched
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub rules: RobotsRules,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Wraps `rules` stamped with the current time
    pub fn new(rules: RobotsRules) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// True once the entry is older than 24 hours
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(MAX_AGE_HOURS)
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_fresh() {
        let cached = CachedRobots::new(RobotsRules::allow_all());
        assert!(!cached.is_stale());
    }

    #[test]
    fn test_entry_goes_stale_after_a_day() {
        let mut cached = CachedRobots::new(RobotsRules::allow_all());

        cached.fetched_at = Utc::now() - Duration::hours(23);
        assert!(!cached.is_stale());

        cached.fetched_at = Utc::now() - Duration::hours(25);
        assert!(cached.is_stale());
    }
}
