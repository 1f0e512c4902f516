//! Session state shared between the provider and its readers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{LanguageCode, LanguageCodes};

/// Fetch status of the active language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Content for the current language is resolved.
    Idle,
    /// A language resolution is in flight.
    #[default]
    Loading,
    /// The last resolution failed.
    Failed,
}

impl FetchStatus {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Where the content for a session comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contentMode", rename_all = "lowercase")]
pub enum ContentMode {
    /// Fetch bundles at runtime, keyed by `content_key`.
    Headless {
        #[serde(rename = "contentKey")]
        content_key: String,
    },
    /// Documents supplied up front, one per language.
    Static {
        #[serde(rename = "staticContent")]
        content: HashMap<LanguageCode, Value>,
    },
}

impl ContentMode {
    /// Headless mode for a content key.
    #[must_use]
    pub fn headless(content_key: impl Into<String>) -> Self {
        Self::Headless {
            content_key: content_key.into(),
        }
    }

    /// Static mode from `(language, document)` pairs.
    #[must_use]
    pub fn static_content<I, L>(content: I) -> Self
    where
        I: IntoIterator<Item = (L, Value)>,
        L: Into<LanguageCode>,
    {
        Self::Static {
            content: content.into_iter().map(|(l, v)| (l.into(), v)).collect(),
        }
    }
}

/// Snapshot of one provider's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub language_codes: LanguageCodes,
    pub status: FetchStatus,
    pub current_language_code: Option<LanguageCode>,
}

impl SessionState {
    /// Initial state for a freshly mounted provider.
    ///
    /// An empty language set starts out `Failed` with no current language.
    #[must_use]
    pub fn initial(language_codes: LanguageCodes) -> Self {
        let current_language_code = language_codes.default_language().cloned();
        let status = if language_codes.is_empty() {
            FetchStatus::Failed
        } else {
            FetchStatus::Loading
        };
        Self {
            language_codes,
            status,
            current_language_code,
        }
    }
}
