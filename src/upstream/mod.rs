//! Upstream statistics API client.
//!
//! Read-only access to the speedrunning statistics service. All requests
//! carry a timeout and transient failures (transport errors, 429, 5xx) are
//! retried a bounded number of times with exponential backoff; everything
//! else surfaces as a `FetchError` for the caller to degrade into an
//! explicit empty value.

pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Category, CategoryId, Game, GameId, Leaderboard, Selection, Variable};
use crate::normalize::{self, PlayerDetails};
use self::wire::{Envelope, WireCategory, WireGame, WireLeaderboard, WireUser, WireVariable};

/// Errors that can occur while querying the upstream service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Transient failures are worth retrying; client errors are not.
    fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Configuration for the upstream client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (trailing slash required for joins)
    pub base_url: Url,

    /// Curated series whose games are listed
    pub series_id: String,

    /// Request timeout
    pub timeout: Duration,

    /// Retry attempts for transient failures
    pub max_retries: u32,

    /// First retry delay; doubles per attempt
    pub backoff_initial: Duration,

    /// User agent string
    pub user_agent: String,
}

pub const DEFAULT_BASE_URL: &str = "https://www.speedrun.com/api/v1/";

/// Series id of the curated "Souls" collection.
pub const DEFAULT_SERIES_ID: &str = "wnp06d7m";

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            series_id: DEFAULT_SERIES_ID.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_initial: Duration::from_millis(500),
            user_agent: format!("runboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Read-only source of normalized leaderboard data.
///
/// Implemented by [`SpeedrunClient`] against the live service and by
/// scripted in-memory sources in tests.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Games in the curated collection.
    async fn list_games(&self) -> Result<Vec<Game>, FetchError>;

    /// Categories of one game.
    async fn list_categories(&self, game_id: &GameId) -> Result<Vec<Category>, FetchError>;

    /// Sub-category variables of one category, in upstream order.
    async fn list_variables(&self, category_id: &CategoryId) -> Result<Vec<Variable>, FetchError>;

    /// Ranked, player-resolved runs for a selection.
    async fn fetch_leaderboard(&self, selection: &Selection) -> Result<Leaderboard, FetchError>;
}

/// HTTP client for the speedrunning statistics service.
pub struct SpeedrunClient {
    client: Client,
    config: ClientConfig,
}

impl SpeedrunClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("runboard/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(ClientConfig::default())
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// GET a JSON payload, retrying transient failures with backoff.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.try_get(url.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_initial * 2u32.pow(attempt);
                    warn!("Fetch of {} failed ({}), retrying in {:?}", url, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve the display identity for each run's first listed player.
    ///
    /// Registered accounts get a secondary lookup for name, styling and
    /// country; lookup failures and guest runners fall back to the literal
    /// name carried on the run itself.
    async fn resolve_players(&self, board: &WireLeaderboard) -> Vec<PlayerDetails> {
        let mut details = Vec::with_capacity(board.runs.len());
        for placed in &board.runs {
            let resolved = match placed.run.players.first() {
                Some(p) if p.is_registered() => match p.uri.as_deref() {
                    Some(uri) => match self.fetch_player(uri).await {
                        Ok(d) => d,
                        Err(e) => {
                            warn!("Player lookup failed for {}: {}", uri, e);
                            PlayerDetails::guest(p.name.as_deref())
                        }
                    },
                    None => PlayerDetails::guest(p.name.as_deref()),
                },
                Some(p) => PlayerDetails::guest(p.name.as_deref()),
                None => PlayerDetails::guest(None),
            };
            details.push(resolved);
        }
        details
    }

    async fn fetch_player(&self, uri: &str) -> Result<PlayerDetails, FetchError> {
        let url = Url::parse(uri).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", uri, e)))?;
        let user: Envelope<WireUser> = self.get_json(url).await?;
        Ok(normalize::player(user.data))
    }
}

#[async_trait]
impl StatsSource for SpeedrunClient {
    async fn list_games(&self) -> Result<Vec<Game>, FetchError> {
        let url = self.endpoint(&format!("series/{}/games", self.config.series_id))?;
        let games: Envelope<Vec<WireGame>> = self.get_json(url).await?;
        Ok(normalize::games(games.data))
    }

    async fn list_categories(&self, game_id: &GameId) -> Result<Vec<Category>, FetchError> {
        let url = self.endpoint(&format!("games/{}/categories", game_id))?;
        let categories: Envelope<Vec<WireCategory>> = self.get_json(url).await?;
        Ok(normalize::categories(categories.data, game_id))
    }

    async fn list_variables(&self, category_id: &CategoryId) -> Result<Vec<Variable>, FetchError> {
        let url = self.endpoint(&format!("categories/{}/variables", category_id))?;
        let variables: Envelope<Vec<WireVariable>> = self.get_json(url).await?;
        Ok(normalize::subcategory_variables(variables.data))
    }

    async fn fetch_leaderboard(&self, selection: &Selection) -> Result<Leaderboard, FetchError> {
        let mut url = self.endpoint(&format!(
            "leaderboards/{}/category/{}",
            selection.game_id, selection.category_id
        ))?;
        if let (Some(variable_id), Some(value_id)) = (&selection.variable_id, &selection.value_id)
        {
            url.query_pairs_mut()
                .append_pair(&format!("var-{}", variable_id), value_id.as_str());
        }

        let board: Envelope<WireLeaderboard> = self.get_json(url).await?;
        let players = self.resolve_players(&board.data).await;
        Ok(normalize::leaderboard(&board.data, &players))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.series_id, DEFAULT_SERIES_ID);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_endpoint_join() {
        let client = SpeedrunClient::with_defaults().unwrap();
        let url = client.endpoint("series/wnp06d7m/games").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.speedrun.com/api/v1/series/wnp06d7m/games"
        );
    }

    #[test]
    fn test_leaderboard_url_carries_variable_filter() {
        let client = SpeedrunClient::with_defaults().unwrap();
        let mut url = client.endpoint("leaderboards/g/category/c").unwrap();
        url.query_pairs_mut().append_pair("var-5lyjpk0l", "mln3xvlq");
        assert!(url.as_str().ends_with("?var-5lyjpk0l=mln3xvlq"));
    }

    #[test]
    fn test_transient_classification() {
        let rate_limited = FetchError::HttpStatus {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        let server_error = FetchError::HttpStatus {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        let not_found = FetchError::HttpStatus {
            status: 404,
            message: "Not Found".to_string(),
        };
        let malformed = FetchError::Malformed {
            url: "https://example.com".to_string(),
            message: "missing field `data`".to_string(),
        };

        assert!(rate_limited.is_transient());
        assert!(server_error.is_transient());
        assert!(!not_found.is_transient());
        assert!(!malformed.is_transient());
    }
}
