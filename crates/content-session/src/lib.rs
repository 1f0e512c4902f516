//! Localized content sessions.
//!
//! Provides:
//! - `ContentProvider` - Owns the active language and its fetch status
//! - `ContentContext` - Handle for readers of a provider's session
//! - Hook- and component-style accessors over the content store

pub mod accessors;
pub mod components;
pub mod config;
pub mod context;
pub mod error;
pub mod provider;

pub use accessors::{use_get_image, use_get_text, use_is_fetching_content, use_manage_language};
pub use components::{ImageView, render_image, render_text, render_variation};
pub use config::{ErrorCallback, ProviderOptions};
pub use content_session_core::{
    ContentMode, ContentStore, FetchStatus, ImageData, LanguageCode, LanguageCodes, SessionState,
    Variables,
};
pub use context::{ContentContext, LanguageManager};
pub use error::{ConfigurationError, ContentError};
pub use provider::ContentProvider;
