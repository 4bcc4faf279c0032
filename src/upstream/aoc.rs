use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::LeaderboardProvider;
use crate::db::models::Participant;
use crate::error::{Error, Result};

/// Client for the Advent of Code private leaderboard API.
pub struct AocClient {
    http: Client,
    base_url: String,
    event_year: u16,
    leaderboard_id: u64,
}

impl AocClient {
    pub fn new(
        base_url: &str,
        event_year: u16,
        leaderboard_id: u64,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(AocClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            event_year,
            leaderboard_id,
        })
    }
}

#[async_trait]
impl LeaderboardProvider for AocClient {
    fn name(&self) -> &str {
        "AdventOfCode"
    }

    async fn fetch(&self, session_cookie: &str) -> Result<Vec<Participant>> {
        let url = format!(
            "{}/{}/leaderboard/private/view/{}.json",
            self.base_url, self.event_year, self.leaderboard_id
        );
        debug!("Fetching leaderboard from {}", url);

        let resp = self
            .http
            .get(&url)
            .header("cookie", format!("session={session_cookie}"))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            // AoC answers with 500 when the session cookie has expired.
            return Err(Error::UpstreamUnavailable(format!("status {status}")));
        }

        let body = resp.text().await?;
        parse_members(&body)
    }
}

/// Response shape of the private leaderboard endpoint. The member map is
/// keyed by arbitrary strings; `id` arrives as a string-encoded integer.
#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    members: HashMap<String, MemberRecord>,
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    id: String,
    name: String,
    stars: u32,
}

fn parse_members(body: &str) -> Result<Vec<Participant>> {
    let parsed: LeaderboardResponse =
        serde_json::from_str(body).map_err(|e| Error::UpstreamMalformed(e.to_string()))?;

    parsed
        .members
        .into_values()
        .map(|member| {
            let id = member.id.parse::<i64>().map_err(|_| {
                Error::UpstreamMalformed(format!("non-numeric member id {:?}", member.id))
            })?;
            Ok(Participant {
                id,
                name: member.name,
                stars: member.stars,
            })
        })
        .collect()
}
