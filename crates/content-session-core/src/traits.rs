//! Core traits for content storage and fetching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    LanguageCode, LanguageCodes,
    document::{ImageContent, TextContent, Variables},
};

/// Registration for headless content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// Languages the store should accept fetches for.
    pub language_codes: LanguageCodes,
    /// Remote bundle identifier.
    pub content_key: String,
}

/// Fetcher error.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Invalid content document: {0}")]
    Decode(String),
    #[error("No content for language: {0}")]
    NotFound(LanguageCode),
}

/// Content store error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Content storage not initialized")]
    NotInitialized,
    #[error("Language not registered: {0}")]
    UnknownLanguage(LanguageCode),
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Registration changed while fetching {0}")]
    Superseded(LanguageCode),
    #[error("Storage error: {0}")]
    Internal(String),
}

/// Process-wide content store.
///
/// Writes go through `init_content_storage`, `fetch_content` and
/// `set_content_language`; each of the latter two also scopes the store to
/// that language, which is what the read accessors use.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Register languages and content key for headless fetching.
    ///
    /// Calling this again with an identical config must be a no-op.
    fn init_content_storage(&self, config: &StorageConfig);

    /// Fetch the bundle for `language` and make it active.
    ///
    /// A bundle whose registration was replaced during the fetch must be
    /// dropped with [`StoreError::Superseded`].
    async fn fetch_content(&self, language: &LanguageCode) -> Result<(), StoreError>;

    /// Register a pre-resolved document for `language` and make it active.
    fn set_content_language(&self, language: &LanguageCode, content: Value);

    /// Re-activate an already loaded language. Returns `false` if it was never loaded.
    fn select_language(&self, language: &LanguageCode) -> bool;

    /// Text in the active language.
    fn get_text(&self, content_id: &str, variables: Option<&Variables>) -> TextContent;

    /// Image in the active language.
    fn get_image(&self, content_id: &str) -> ImageContent;

    /// Variation value in the active language.
    fn get_variation(
        &self,
        content_id: &str,
        variation_id: Option<&str>,
        variables: Option<&Variables>,
    ) -> Option<String>;
}

/// Source of raw language bundles for headless mode.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the JSON document for `language` under `content_key`.
    async fn fetch(&self, content_key: &str, language: &LanguageCode) -> Result<Value, FetchError>;
}
