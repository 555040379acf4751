use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{EventFetcher, FetchError, FetchOutcome};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
        }
    }
}

/// [EventFetcher] backed by the public REST API. Requests are never retried; the operator
/// decides whether to try again.
pub struct GithubClient {
    client: Client,
    api_url: Url,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("API url {api_url} can't be used as a base"));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_url,
            token: config.token.filter(|v| !v.is_empty()),
        })
    }

    /// `<api>/users/<username>/events`. The username goes in as a single escaped segment.
    pub fn events_url(&self, username: &str) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["users", username, "events"]);
        }
        url
    }
}

#[async_trait]
impl EventFetcher for GithubClient {
    #[instrument(skip(self))]
    async fn fetch(&self, username: &str) -> Result<FetchOutcome, FetchError> {
        let url = self.events_url(username);
        debug!("Requesting {url}");

        let mut request = self.client.get(url).header(ACCEPT, ACCEPT_GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(FetchError::from_transport)
            .inspect_err(|e| warn!("Request failed {e:?}"))?;

        let status = response.status();
        if let Some(error) = FetchError::from_status(status) {
            warn!("GitHub answered with {status}");
            return Err(error);
        }

        let body = response
            .bytes()
            .await
            .map_err(FetchError::from_transport)?;
        let body: Value = serde_json::from_slice(&body)
            .map_err(FetchError::MalformedBody)
            .inspect_err(|e| warn!("Response wasn't json {e:?}"))?;

        Ok(FetchOutcome::from_body(body))
    }
}
