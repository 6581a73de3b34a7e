use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::models::{BggId, Game, GameDetails};
use crate::errors::{fetch_context, parse_context};

use super::parsers::{parse_collection, parse_game_details};

const API_BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";
const THING_DELAY_MS: u64 = 2000; // BGG throttles aggressive thing requests
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// BoardGameGeek XML API client
pub struct BggClient {
    client: Client,
    thing_delay: Duration,
}

impl BggClient {
    pub fn new() -> Result<Self> {
        let client = Self::build_client()?;

        Ok(Self {
            client,
            thing_delay: Duration::from_millis(THING_DELAY_MS),
        })
    }

    /// Fetch the owned-games collection for a user
    pub async fn fetch_collection(&self, username: &str) -> Result<Vec<Game>> {
        info!("Fetching BGG collection for user: {}", username);

        let url = collection_url(username);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| fetch_context(&url))?;

        // BGG queues collection requests it has not prepared yet
        if response.status() == StatusCode::ACCEPTED {
            anyhow::bail!("Collection for {} is still being prepared, retry shortly", username);
        }

        if !response.status().is_success() {
            anyhow::bail!("BGG API error: {}", response.status());
        }

        let body = response.text().await.with_context(|| fetch_context(&url))?;
        let games = parse_collection(&body).context(parse_context("collection"))?;

        if games.is_empty() {
            warn!("BGG returned an empty collection for {}", username);
        } else {
            info!("Fetched {} games for {}", games.len(), username);
        }

        Ok(games)
    }

    /// Fetch per-game details: complexity and the player-count poll
    pub async fn fetch_game_details(&self, game_id: BggId) -> Result<GameDetails> {
        sleep(self.thing_delay).await;

        let url = thing_url(game_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| fetch_context(&url))?;

        if !response.status().is_success() {
            anyhow::bail!("BGG API error for game {}: {}", game_id, response.status());
        }

        let body = response.text().await.with_context(|| fetch_context(&url))?;
        parse_game_details(&body, game_id).context(parse_context("game details"))
    }

    fn build_client() -> Result<Client> {
        Client::builder()
            .user_agent("ShelfRanker/0.1")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")
    }
}

fn collection_url(username: &str) -> String {
    format!(
        "{}/collection?username={}&own=1&excludesubtype=boardgameexpansion&stats=1",
        API_BASE_URL,
        urlencoding::encode(username)
    )
}

fn thing_url(game_id: BggId) -> String {
    format!("{}/thing?id={}&stats=1", API_BASE_URL, game_id)
}
