use chrono::{DateTime, Duration, Utc};

/// Decides whether the cached leaderboard is stale enough to warrant an
/// upstream refetch. One instance per deployment; the TTL is fixed at
/// construction, with no per-request override.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
    ttl: Duration,
}

impl FreshnessPolicy {
    pub fn new(ttl: Duration) -> Self {
        FreshnessPolicy { ttl }
    }

    /// `true` when a refresh is required: no snapshot exists yet, or the
    /// latest one is strictly older than the TTL. A snapshot exactly
    /// `ttl` old is still fresh.
    pub fn is_stale(&self, now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> bool {
        match last {
            None => true,
            Some(ts) => now - ts > self.ttl,
        }
    }
}
