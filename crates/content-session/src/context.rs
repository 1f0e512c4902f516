//! Session context handed to downstream readers.

use std::sync::{Arc, Weak};

use content_session_core::{ContentStore, FetchStatus, LanguageCode, LanguageCodes, SessionState};
use tokio::sync::broadcast;

use crate::{error::ConfigurationError, provider::Session};

/// Read handle onto a provider's session.
///
/// Obtained from [`ContentProvider::context`](crate::ContentProvider::context).
/// Every accessor fails with [`ConfigurationError::OutsideProvider`] once the
/// provider has been dropped, or for a [`detached`](Self::detached) handle.
pub struct ContentContext<S: ContentStore + ?Sized> {
    session: Weak<Session<S>>,
}

impl<S: ContentStore + ?Sized> Clone for ContentContext<S> {
    fn clone(&self) -> Self {
        Self {
            session: Weak::clone(&self.session),
        }
    }
}

impl<S: ContentStore + ?Sized> ContentContext<S> {
    pub(crate) const fn new(session: Weak<Session<S>>) -> Self {
        Self { session }
    }

    /// A handle not attached to any provider.
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            session: Weak::new(),
        }
    }

    fn session(&self) -> Result<Arc<Session<S>>, ConfigurationError> {
        self.session
            .upgrade()
            .ok_or(ConfigurationError::OutsideProvider)
    }

    /// Whether the owning provider is still mounted.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.session.strong_count() > 0
    }

    /// Current session snapshot.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn state(&self) -> Result<SessionState, ConfigurationError> {
        Ok(self.session()?.channel().snapshot())
    }

    /// Current fetch status.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn status(&self) -> Result<FetchStatus, ConfigurationError> {
        Ok(self.state()?.status)
    }

    /// Current language, if any.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn current_language_code(&self) -> Result<Option<LanguageCode>, ConfigurationError> {
        Ok(self.state()?.current_language_code)
    }

    /// Configured languages.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn language_codes(&self) -> Result<LanguageCodes, ConfigurationError> {
        Ok(self.state()?.language_codes)
    }

    /// Switch the provider's language.
    ///
    /// # Errors
    /// Returns error if used outside a provider. Resolution failures are not
    /// errors here; they show up as `Failed` status.
    pub async fn set_language(
        &self,
        language: impl Into<LanguageCode>,
    ) -> Result<(), ConfigurationError> {
        let session = self.session()?;
        session.set_language(language.into()).await;
        Ok(())
    }

    /// The provider's content store.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn store(&self) -> Result<Arc<S>, ConfigurationError> {
        Ok(Arc::clone(self.session()?.store()))
    }

    /// Live state changes.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<SessionState>, ConfigurationError> {
        Ok(self.session()?.channel().subscribe())
    }

    /// Current state followed by every change.
    ///
    /// # Errors
    /// Returns error if used outside a provider.
    pub fn state_stream(
        &self,
    ) -> Result<futures::stream::BoxStream<'static, SessionState>, ConfigurationError> {
        Ok(self.session()?.channel().snapshot_plus_stream())
    }
}

impl<S: ContentStore> Default for ContentContext<S> {
    fn default() -> Self {
        Self::detached()
    }
}

/// Language switcher returned by
/// [`use_manage_language`](crate::accessors::use_manage_language).
pub struct LanguageManager<S: ContentStore + ?Sized> {
    pub language_codes: LanguageCodes,
    pub current_language_code: Option<LanguageCode>,
    context: ContentContext<S>,
}

impl<S: ContentStore + ?Sized> LanguageManager<S> {
    pub(crate) fn new(context: ContentContext<S>) -> Result<Self, ConfigurationError> {
        let state = context.state()?;
        Ok(Self {
            language_codes: state.language_codes,
            current_language_code: state.current_language_code,
            context,
        })
    }

    /// Switch language unless it is already the current one.
    ///
    /// # Errors
    /// Returns error if the provider is gone.
    pub async fn set_language(&self, language: impl Into<LanguageCode>) -> Result<(), ConfigurationError> {
        let language = language.into();
        if self.current_language_code.as_ref() == Some(&language) {
            return Ok(());
        }
        self.context.set_language(language).await
    }
}
