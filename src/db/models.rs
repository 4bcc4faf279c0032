use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ranked entrant on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Upstream member ID (unique within a snapshot)
    pub id: i64,
    pub name: String,
    /// Score, named `stars` on the wire for compatibility with the
    /// upstream leaderboard format
    pub stars: u32,
}

/// One immutable, timestamped capture of the full participant list.
/// Snapshots are never mutated or deleted; they form an append-only log
/// ordered by timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub participants: Vec<Participant>,
}
