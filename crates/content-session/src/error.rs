//! Session errors.

use content_session_core::{LanguageCode, StoreError};
use thiserror::Error;

/// Programmer or configuration mistakes.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("languageCodes must not be empty")]
    EmptyLanguageCodes,
    #[error("useContent must be used within a ContentProvider")]
    OutsideProvider,
    #[error("Invalid provider options: {0}")]
    Invalid(String),
}

/// Errors reported through a provider's `on_error` callback.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Static content not found for language: {0}")]
    StaticContentNotFound(LanguageCode),
    #[error("Language not configured: {0}")]
    UnsupportedLanguage(LanguageCode),
}
