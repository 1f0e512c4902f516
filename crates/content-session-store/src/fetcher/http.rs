//! HTTP content fetcher (feature-gated).

use std::time::Duration;

use async_trait::async_trait;
use content_session_core::{ContentFetcher, FetchError, LanguageCode};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Default content CDN.
pub const DEFAULT_BASE_URL: &str = "https://cdn.contentstorage.app";

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP fetcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFetcherConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpFetcherConfig {
    /// Read `CONTENT_BASE_URL` and `CONTENT_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CONTENT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("CONTENT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }
}

/// Fetches `{base_url}/{content_key}/content/{LANGUAGE}.json`.
pub struct HttpContentFetcher {
    client: Client,
    base_url: String,
}

impl HttpContentFetcher {
    /// Create a fetcher.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the bundle for one language.
    #[must_use]
    pub fn content_url(&self, content_key: &str, language: &LanguageCode) -> String {
        format!(
            "{}/{}/content/{}.json",
            self.base_url,
            content_key.trim_matches('/'),
            language.as_str().to_uppercase()
        )
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, content_key: &str, language: &LanguageCode) -> Result<Value, FetchError> {
        let url = self.content_url(content_key, language);
        tracing::debug!(%url, "Fetching content bundle");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(language.clone()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
