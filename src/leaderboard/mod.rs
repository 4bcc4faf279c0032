pub mod freshness;

pub use freshness::FreshnessPolicy;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::models::Snapshot;
use crate::db::SnapshotStore;
use crate::error::Result;
use crate::secrets::SessionSource;
use crate::upstream::LeaderboardProvider;

/// Orchestrates one leaderboard request: decide freshness, then either
/// refetch-and-persist or serve the latest stored snapshot.
pub struct LeaderboardService {
    store: SnapshotStore,
    provider: Arc<dyn LeaderboardProvider>,
    sessions: Arc<dyn SessionSource>,
    policy: FreshnessPolicy,
}

impl LeaderboardService {
    pub fn new(
        store: SnapshotStore,
        provider: Arc<dyn LeaderboardProvider>,
        sessions: Arc<dyn SessionSource>,
        policy: FreshnessPolicy,
    ) -> Self {
        LeaderboardService {
            store,
            provider,
            sessions,
            policy,
        }
    }

    /// Serve the leaderboard as of `now`.
    ///
    /// No lock serializes refreshes: two concurrent callers that both
    /// observe staleness will each fetch and append. Duplicates are
    /// harmless: every append is a complete snapshot and "latest"
    /// resolves by timestamp.
    ///
    /// A failure from any collaborator aborts the call unmodified; a
    /// fetch failure never falls back to the stale snapshot.
    pub async fn get_leaderboard(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let last = self.store.latest_timestamp()?;

        if self.policy.is_stale(now, last) {
            info!("cache stale, refreshing from {}", self.provider.name());
            let cookie = self.sessions.session_cookie().await?;
            let participants = self.provider.fetch(&cookie).await?;
            // No await below this point: once the fetch resolves, the
            // append runs to completion even if the caller disconnects.
            let snapshot = self.store.append(&participants)?;
            info!(
                "recorded snapshot with {} participants",
                snapshot.participants.len()
            );
            Ok(snapshot)
        } else {
            debug!("serving cached snapshot");
            self.store.read_latest()
        }
    }
}
