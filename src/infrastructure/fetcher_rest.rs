use std::time::Duration;

use chrono::DateTime;
use log::{debug, error};
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap},
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    FetcherRateLimit, Repository, RepositorySearchFetcher, SearchRequest, SearchResponse, StdResult,
};

/// The REST production endpoint for GitHub.
pub const GITHUB_API_ENDPOINT: &str = "https://api.github.com";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Fetcher error
#[derive(Error, Debug)]
pub enum FetcherError {
    /// The request did not complete or its body could not be decoded
    #[error("Transport error: {0}")]
    Transport(String),
    /// The server answered with a non success status
    #[error("Remote error: HTTP {status}: {message}")]
    Protocol { status: u16, message: String },
}

#[derive(Deserialize, Debug)]
struct SearchRepositoriesBody {
    total_count: u64,
    incomplete_results: bool,
    items: Vec<RepositoryItem>,
}

#[derive(Deserialize, Debug)]
struct RepositoryItem {
    id: u64,
    name: String,
    full_name: Option<String>,
    description: Option<String>,
    html_url: Option<String>,
    stargazers_count: Option<u32>,
    forks_count: Option<u32>,
    language: Option<String>,
}

impl From<RepositoryItem> for Repository {
    fn from(item: RepositoryItem) -> Self {
        Repository::new(item.id, &item.name)
            .with_full_name(item.full_name)
            .with_description(item.description)
            .with_url(item.html_url)
            .with_counters(item.stargazers_count, item.forks_count)
            .with_language(item.language)
    }
}

fn parse_rate_limit(headers: &HeaderMap) -> Option<FetcherRateLimit> {
    let header_value = |name: &str| -> Option<i64> {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    };

    Some(FetcherRateLimit {
        limit: header_value("x-ratelimit-limit")? as u32,
        used: header_value("x-ratelimit-used").unwrap_or_default() as u32,
        remaining: header_value("x-ratelimit-remaining")? as u32,
        reset_at: DateTime::from_timestamp(header_value("x-ratelimit-reset")?, 0)?,
    })
}

/// Fetches repository search pages from the GitHub REST API.
pub struct RestSearchFetcher {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl RestSearchFetcher {
    /// Creates a new `RestSearchFetcher` targeting the given endpoint.
    pub fn try_new(endpoint: &str, api_token: Option<String>, timeout: Duration) -> StdResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait::async_trait]
impl RepositorySearchFetcher for RestSearchFetcher {
    async fn search(&self, request: &SearchRequest) -> StdResult<SearchResponse> {
        let url = format!("{}/search/repositories", self.endpoint);
        let mut builder = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[("sort", "stars")])
            .query(request);
        if let Some(api_token) = &self.api_token {
            builder = builder.bearer_auth(api_token);
        }
        debug!("Sending {request}");

        let response = builder.send().await.map_err(|e| {
            error!("Request to {url} failed: {e}");
            FetcherError::Transport(e.to_string())
        })?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetcherError::Protocol {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        let rate_limit = parse_rate_limit(response.headers());
        let body = response
            .json::<SearchRepositoriesBody>()
            .await
            .map_err(|e| FetcherError::Transport(format!("Failed to parse response: {e}")))?;

        Ok(SearchResponse::new(
            body.items.into_iter().map(Repository::from).collect(),
            body.total_count,
            body.incomplete_results,
            rate_limit,
        ))
    }
}
