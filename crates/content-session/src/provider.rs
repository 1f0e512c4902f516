//! Content provider: the per-mount language session state machine.

use std::sync::{
    Arc, PoisonError, RwLock, RwLockReadGuard,
    atomic::{AtomicU64, Ordering},
};

use content_session_core::{
    ContentMode, ContentStore, FetchStatus, LanguageCode, LanguageCodes, SessionState,
    StateChannel, StorageConfig,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    config::ProviderOptions,
    context::ContentContext,
    error::{ConfigurationError, ContentError},
};

/// How one `set_language` call resolves its content.
enum Resolution {
    Fetch,
    Static(Option<Value>),
}

/// State shared between a provider and the contexts it hands out.
pub(crate) struct Session<S: ContentStore + ?Sized> {
    id: Uuid,
    store: Arc<S>,
    options: RwLock<ProviderOptions>,
    channel: StateChannel,
    sequence: AtomicU64,
}

impl<S: ContentStore + ?Sized> Session<S> {
    pub(crate) fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) const fn channel(&self) -> &StateChannel {
        &self.channel
    }

    fn options(&self) -> RwLockReadGuard<'_, ProviderOptions> {
        self.options.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn report(&self, error: &ContentError) {
        let on_error = self.options().error_callback().cloned();
        if let Some(on_error) = on_error {
            on_error(error);
        }
    }

    async fn initialize(&self) {
        let (codes, content_key) = {
            let options = self.options();
            let content_key = match &options.content_mode {
                ContentMode::Headless { content_key } => Some(content_key.clone()),
                ContentMode::Static { .. } => None,
            };
            (options.language_codes.clone(), content_key)
        };
        self.channel.publish(SessionState::initial(codes.clone()));

        let Some(default_language) = codes.default_language().cloned() else {
            // Invalidate anything still in flight from a previous configuration.
            self.sequence.fetch_add(1, Ordering::SeqCst);
            tracing::error!(session = %self.id, "No language codes configured");
            self.report(&ContentError::from(ConfigurationError::EmptyLanguageCodes));
            return;
        };

        if let Some(content_key) = content_key {
            self.store.init_content_storage(&StorageConfig {
                language_codes: codes,
                content_key,
            });
        }

        self.set_language(default_language).await;
    }

    pub(crate) async fn set_language(&self, language: LanguageCode) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let resolution = {
            let options = self.options();
            options
                .language_codes
                .contains(&language)
                .then(|| match &options.content_mode {
                    ContentMode::Headless { .. } => Resolution::Fetch,
                    ContentMode::Static { content } => {
                        Resolution::Static(content.get(&language).cloned())
                    }
                })
        };

        let Some(resolution) = resolution else {
            self.channel.update(|s| s.status = FetchStatus::Failed);
            tracing::warn!(session = %self.id, %language, "Requested language is not configured");
            self.report(&ContentError::UnsupportedLanguage(language));
            return;
        };

        let result = match resolution {
            Resolution::Fetch => {
                self.channel.update(|s| s.status = FetchStatus::Loading);
                self.store
                    .fetch_content(&language)
                    .await
                    .map_err(ContentError::from)
            }
            Resolution::Static(Some(content)) => {
                self.store.set_content_language(&language, content);
                Ok(())
            }
            Resolution::Static(None) => Err(ContentError::StaticContentNotFound(language.clone())),
        };

        self.settle(seq, language, result);
    }

    fn settle(&self, seq: u64, language: LanguageCode, result: Result<(), ContentError>) {
        let latest = self.sequence.load(Ordering::SeqCst);
        if latest != seq {
            tracing::debug!(
                session = %self.id,
                %language,
                seq,
                latest,
                "Discarding stale language resolution"
            );
            if result.is_ok() {
                self.rescope_store();
            }
            return;
        }

        match result {
            Ok(()) => {
                self.channel.update(|s| {
                    s.status = FetchStatus::Idle;
                    s.current_language_code = Some(language.clone());
                });
                tracing::info!(session = %self.id, %language, "Language content ready");
            }
            Err(error) => {
                self.channel.update(|s| {
                    s.status = FetchStatus::Failed;
                    s.current_language_code = Some(language.clone());
                });
                tracing::warn!(session = %self.id, %language, %error, "Language resolution failed");
                self.report(&error);
            }
        }
    }

    /// A stale fetch re-scoped the store; point it back at the settled language.
    fn rescope_store(&self) {
        let state = self.channel.snapshot();
        if state.status != FetchStatus::Idle {
            return;
        }
        if let Some(current) = state.current_language_code {
            self.store.select_language(&current);
        }
    }
}

/// Owns one language session over a shared [`ContentStore`].
///
/// Dropping the provider ends the session; contexts handed out by
/// [`ContentProvider::context`] stop working at that point.
pub struct ContentProvider<S: ContentStore + ?Sized> {
    session: Arc<Session<S>>,
}

impl<S: ContentStore + ?Sized> ContentProvider<S> {
    /// Create a provider without resolving any language yet.
    ///
    /// The session starts out `Loading` (or `Failed` for an empty language
    /// set) until [`initialize`](Self::initialize) runs.
    #[must_use]
    pub fn new(store: Arc<S>, options: ProviderOptions) -> Self {
        let initial = SessionState::initial(options.language_codes.clone());
        let session = Session {
            id: Uuid::new_v4(),
            store,
            options: RwLock::new(options),
            channel: StateChannel::new(initial),
            sequence: AtomicU64::new(0),
        };
        tracing::debug!(session = %session.id, "Content session mounted");
        Self {
            session: Arc::new(session),
        }
    }

    /// Create a provider and resolve the default language.
    pub async fn mount(store: Arc<S>, options: ProviderOptions) -> Self {
        let provider = Self::new(store, options);
        provider.initialize().await;
        provider
    }

    /// Run the initialization contract for the current options.
    ///
    /// An empty language set fails immediately without touching the store.
    /// Headless mode registers with the store before the default language is
    /// fetched.
    pub async fn initialize(&self) {
        self.session.initialize().await;
    }

    /// Run [`initialize`](Self::initialize) on the tokio runtime.
    pub fn spawn_initialize(&self) -> tokio::task::JoinHandle<()>
    where
        S: 'static,
    {
        let session = Arc::clone(&self.session);
        tokio::spawn(async move { session.initialize().await })
    }

    /// Replace languages and content mode, then re-initialize.
    pub async fn reconfigure(&self, options: ProviderOptions) {
        *self
            .session
            .options
            .write()
            .unwrap_or_else(PoisonError::into_inner) = options;
        self.session.initialize().await;
    }

    /// Switch the active language.
    ///
    /// Always settles on `Idle` or `Failed`; failures go to the `on_error`
    /// callback instead of being returned. If another call starts before this
    /// one finishes, this call's result is discarded.
    pub async fn set_language(&self, language: impl Into<LanguageCode>) {
        self.session.set_language(language.into()).await;
    }

    /// Handle for downstream readers.
    #[must_use]
    pub fn context(&self) -> ContentContext<S> {
        ContentContext::new(Arc::downgrade(&self.session))
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.channel.snapshot()
    }

    /// Current fetch status.
    #[must_use]
    pub fn status(&self) -> FetchStatus {
        self.state().status
    }

    /// Language of the last settled request.
    #[must_use]
    pub fn current_language_code(&self) -> Option<LanguageCode> {
        self.state().current_language_code
    }

    /// Configured languages; the first is the default.
    #[must_use]
    pub fn language_codes(&self) -> LanguageCodes {
        self.state().language_codes
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.session.store
    }

    /// Session id used in log events.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.session.id
    }

    /// Pick what to show: `loading_fallback` while loading, otherwise `children`.
    pub fn render<T>(&self, children: T, loading_fallback: Option<T>) -> T {
        match loading_fallback {
            Some(fallback) if self.status().is_loading() => fallback,
            _ => children,
        }
    }
}

impl<S: ContentStore + ?Sized> Drop for ContentProvider<S> {
    fn drop(&mut self) {
        tracing::debug!(session = %self.session.id, "Content session unmounted");
    }
}
