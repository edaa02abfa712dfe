use crate::robots::RobotsRules;
use chrono::{DateTime, Duration, Utc};

/// How long a fetched robots.txt stays valid
pub const ROBOTS_TTL_HOURS: i64 = 24;

/// robots.txt rules for one origin, stamped with their fetch time
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub rules: RobotsRules,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    pub fn new(rules: RobotsRules) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// True once the entry is older than [`ROBOTS_TTL_HOURS`]
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now - self.fetched_at > Duration::hours(ROBOTS_TTL_HOURS)
    }
}
