use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod config;
mod db;
mod error;
mod leaderboard;
mod secrets;
mod server;
mod upstream;

use config::Config;
use db::SnapshotStore;
use leaderboard::{FreshnessPolicy, LeaderboardService};
use secrets::{FileSession, SessionSource, StaticSession};
use server::AppState;
use upstream::AocClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Open the snapshot store
    let store = SnapshotStore::open(&config.database_path)?;
    info!("Snapshot store opened: {}", config.database_path);

    // Session cookie source: a mounted secret file wins over the inline value
    let sessions: Arc<dyn SessionSource> = if let Some(path) = &config.session_cookie_file {
        Arc::new(FileSession::new(path))
    } else if let Some(cookie) = &config.session_cookie {
        Arc::new(StaticSession::new(cookie.clone()))
    } else {
        anyhow::bail!("AOC_SESSION_COOKIE or AOC_SESSION_COOKIE_FILE is required");
    };
    info!("Session cookie source: {}", sessions.name());

    let provider = Arc::new(AocClient::new(
        &config.aoc_base_url,
        config.event_year,
        config.leaderboard_id,
        Duration::from_secs(config.upstream_timeout_secs),
    )?);

    let policy = FreshnessPolicy::new(chrono::Duration::minutes(config.cache_ttl_minutes as i64));
    let service = LeaderboardService::new(store, provider, sessions, policy);

    let app = server::router(AppState {
        service: Arc::new(service),
    });
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!(
        "Serving leaderboard {} (event {}) on http://{}, cache TTL {}min",
        config.leaderboard_id, config.event_year, addr, config.cache_ttl_minutes
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
