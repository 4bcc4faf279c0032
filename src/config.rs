use anyhow::Context;
use clap::Parser;
use url::Url;

/// Caching proxy for an Advent of Code private leaderboard
#[derive(Parser, Debug, Clone)]
#[command(name = "starboard", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:9000")]
    pub listen_addr: String,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "starboard.db")]
    pub database_path: String,

    /// Advent of Code base URL
    #[arg(long, env = "AOC_BASE_URL", default_value = "https://adventofcode.com")]
    pub aoc_base_url: String,

    /// Private leaderboard ID (the numeric part of the leaderboard URL)
    #[arg(long, env = "AOC_LEADERBOARD_ID")]
    pub leaderboard_id: u64,

    /// Event year to serve
    #[arg(long, env = "AOC_EVENT_YEAR", default_value = "2025")]
    pub event_year: u16,

    /// Session cookie for the upstream API
    #[arg(long, env = "AOC_SESSION_COOKIE")]
    pub session_cookie: Option<String>,

    /// Path to a file holding the session cookie (e.g. a mounted secret);
    /// takes precedence over AOC_SESSION_COOKIE and is re-read on every
    /// refresh
    #[arg(long, env = "AOC_SESSION_COOKIE_FILE")]
    pub session_cookie_file: Option<String>,

    /// Minutes before a cached snapshot is considered stale
    #[arg(long, env = "CACHE_TTL_MINUTES", default_value = "15")]
    pub cache_ttl_minutes: u64,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session_cookie.is_none() && self.session_cookie_file.is_none() {
            anyhow::bail!(
                "AOC_SESSION_COOKIE or AOC_SESSION_COOKIE_FILE is required to authenticate \
                 against the upstream leaderboard."
            );
        }
        Url::parse(&self.aoc_base_url).context("AOC_BASE_URL is not a valid URL")?;
        if self.cache_ttl_minutes == 0 {
            anyhow::bail!("cache_ttl_minutes must be at least 1");
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("upstream_timeout_secs must be at least 1");
        }
        Ok(())
    }
}
