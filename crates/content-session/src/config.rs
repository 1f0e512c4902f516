//! Provider options.

use std::{collections::HashMap, fmt, path::Path, sync::Arc};

use content_session_core::{ContentMode, LanguageCode, LanguageCodes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigurationError, ContentError};

/// Callback invoked with absorbed resolution errors.
pub type ErrorCallback = Arc<dyn Fn(&ContentError) + Send + Sync>;

/// Construction options for a [`ContentProvider`](crate::ContentProvider).
///
/// Deserialises from the same shape the JavaScript provider takes as props:
///
/// ```json
/// { "languageCodes": ["en", "fr"], "contentMode": "headless", "contentKey": "team/app" }
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// Supported languages; the first is the default.
    pub language_codes: LanguageCodes,
    /// Content source.
    #[serde(flatten)]
    pub content_mode: ContentMode,
    #[serde(skip)]
    on_error: Option<ErrorCallback>,
}

impl ProviderOptions {
    /// Options for any content mode.
    pub fn new<I, C>(language_codes: I, content_mode: ContentMode) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LanguageCode>,
    {
        Self {
            language_codes: LanguageCodes::new(language_codes),
            content_mode,
            on_error: None,
        }
    }

    /// Headless options fetching bundles for `content_key`.
    pub fn headless<I, C>(language_codes: I, content_key: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LanguageCode>,
    {
        Self::new(language_codes, ContentMode::headless(content_key))
    }

    /// Static options with one document per language.
    pub fn static_content<I, C>(language_codes: I, content: HashMap<LanguageCode, Value>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<LanguageCode>,
    {
        Self::new(language_codes, ContentMode::static_content(content))
    }

    /// Set the error callback.
    #[must_use]
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&ContentError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    pub(crate) fn error_callback(&self) -> Option<&ErrorCallback> {
        self.on_error.as_ref()
    }

    /// Parse options from JSON.
    ///
    /// # Errors
    /// Returns error if the JSON does not describe valid options.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Invalid(e.to_string()))
    }

    /// Parse options from a JSON file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Invalid(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }
}

impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("language_codes", &self.language_codes)
            .field("content_mode", &self.content_mode)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_headless_options() {
        let options = ProviderOptions::from_json_str(
            r#"{"languageCodes": ["en", "fr"], "contentMode": "headless", "contentKey": "team/app"}"#,
        )
        .unwrap();
        assert_eq!(options.language_codes.len(), 2);
        assert_eq!(options.content_mode, ContentMode::headless("team/app"));
        assert!(options.error_callback().is_none());
    }

    #[test]
    fn test_parse_static_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({
                "languageCodes": ["en"],
                "contentMode": "static",
                "staticContent": {"en": {"title": "Hello"}}
            })
        )
        .unwrap();

        let options = ProviderOptions::from_json_file(file.path()).unwrap();
        let ContentMode::Static { content } = options.content_mode else {
            panic!("Wrong mode");
        };
        assert_eq!(content[&LanguageCode::from("en")]["title"], "Hello");
    }

    #[test]
    fn test_missing_content_key_is_invalid() {
        let err = ProviderOptions::from_json_str(r#"{"languageCodes": ["en"], "contentMode": "headless"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let err = ProviderOptions::from_json_file("/nonexistent/options.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/options.json"));
    }

    #[test]
    fn test_builder_sets_callback() {
        let options = ProviderOptions::headless(["en"], "key").on_error(|_| {});
        assert!(options.error_callback().is_some());
        assert!(format!("{options:?}").contains("on_error: true"));
    }
}
