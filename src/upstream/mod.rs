pub mod aoc;

pub use aoc::AocClient;

use async_trait::async_trait;

use crate::db::models::Participant;
use crate::error::Result;

/// Trait that every upstream leaderboard provider must implement.
#[async_trait]
pub trait LeaderboardProvider: Send + Sync {
    /// Fetch the current participant list, authenticating with the given
    /// session cookie. The returned order is unspecified; the upstream
    /// keys its members map arbitrarily.
    async fn fetch(&self, session_cookie: &str) -> Result<Vec<Participant>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
