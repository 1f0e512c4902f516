//! In-memory content store.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use content_session_core::{
    ContentDocument, ContentFetcher, ContentStore, FetchError, ImageContent, LanguageCode,
    StorageConfig, StoreError, TextContent, Variables,
};
use serde_json::Value;

#[derive(Default)]
struct Inner {
    config: Option<StorageConfig>,
    documents: HashMap<LanguageCode, ContentDocument>,
    active: Option<LanguageCode>,
    registrations: usize,
}

/// In-memory content store.
///
/// Holds one parsed document per language and scopes reads to the active
/// one. Headless fetches go through the injected [`ContentFetcher`]; a store
/// built without one only serves statically registered content.
pub struct MemoryContentStore {
    inner: RwLock<Inner>,
    fetcher: Option<Arc<dyn ContentFetcher>>,
}

impl MemoryContentStore {
    /// Create a store without a fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            fetcher: None,
        }
    }

    /// Create a store that fetches headless bundles through `fetcher`.
    #[must_use]
    pub fn with_fetcher(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            fetcher: Some(fetcher),
        }
    }

    /// Drop all registrations and documents.
    pub fn reset(&self) {
        *self.write() = Inner::default();
        tracing::debug!("Content storage reset");
    }

    /// Language the read accessors are scoped to.
    #[must_use]
    pub fn active_language(&self) -> Option<LanguageCode> {
        self.read().active.clone()
    }

    /// Whether a document for `language` is held.
    #[must_use]
    pub fn is_loaded(&self, language: &LanguageCode) -> bool {
        self.read().documents.contains_key(language)
    }

    /// Current headless registration.
    #[must_use]
    pub fn config(&self) -> Option<StorageConfig> {
        self.read().config.clone()
    }

    /// Number of registrations that actually changed the config.
    #[must_use]
    pub fn registrations(&self) -> usize {
        self.read().registrations
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_active<T>(&self, f: impl FnOnce(&ContentDocument) -> Option<T>) -> Option<T> {
        let inner = self.read();
        let active = inner.active.as_ref()?;
        inner.documents.get(active).and_then(f)
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn init_content_storage(&self, config: &StorageConfig) {
        let mut inner = self.write();
        if inner.config.as_ref() == Some(config) {
            tracing::debug!(content_key = %config.content_key, "Content storage already initialized");
            return;
        }

        let key_changed = inner
            .config
            .as_ref()
            .is_some_and(|old| old.content_key != config.content_key);
        if key_changed {
            inner.documents.clear();
            inner.active = None;
        } else {
            inner
                .documents
                .retain(|language, _| config.language_codes.contains(language));
            if inner
                .active
                .as_ref()
                .is_some_and(|l| !config.language_codes.contains(l))
            {
                inner.active = None;
            }
        }

        inner.config = Some(config.clone());
        inner.registrations += 1;
        tracing::debug!(
            content_key = %config.content_key,
            languages = config.language_codes.len(),
            "Content storage initialized"
        );
    }

    async fn fetch_content(&self, language: &LanguageCode) -> Result<(), StoreError> {
        let content_key = {
            let inner = self.read();
            let config = inner.config.as_ref().ok_or(StoreError::NotInitialized)?;
            if !config.language_codes.contains(language) {
                return Err(StoreError::UnknownLanguage(language.clone()));
            }
            config.content_key.clone()
        };

        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| StoreError::Internal("No content fetcher configured".to_string()))?;

        let json = fetcher.fetch(&content_key, language).await?;
        if !json.is_object() {
            return Err(FetchError::Decode(format!(
                "expected a JSON object for language {language}"
            ))
            .into());
        }

        let mut inner = self.write();
        let still_registered = inner.config.as_ref().is_some_and(|config| {
            config.content_key == content_key && config.language_codes.contains(language)
        });
        if !still_registered {
            tracing::debug!(
                %language,
                %content_key,
                "Dropping content fetched for a replaced registration"
            );
            return Err(StoreError::Superseded(language.clone()));
        }
        inner.documents.insert(language.clone(), json.into());
        inner.active = Some(language.clone());
        tracing::debug!(%language, %content_key, "Fetched content");
        Ok(())
    }

    fn set_content_language(&self, language: &LanguageCode, content: Value) {
        let mut inner = self.write();
        inner.documents.insert(language.clone(), content.into());
        inner.active = Some(language.clone());
        tracing::debug!(%language, "Registered static content");
    }

    fn select_language(&self, language: &LanguageCode) -> bool {
        let mut inner = self.write();
        if inner.documents.contains_key(language) {
            inner.active = Some(language.clone());
            true
        } else {
            false
        }
    }

    fn get_text(&self, content_id: &str, variables: Option<&Variables>) -> TextContent {
        TextContent {
            text: self
                .with_active(|doc| doc.text(content_id, variables))
                .unwrap_or_default(),
        }
    }

    fn get_image(&self, content_id: &str) -> ImageContent {
        ImageContent {
            data: self.with_active(|doc| doc.image(content_id)),
        }
    }

    fn get_variation(
        &self,
        content_id: &str,
        variation_id: Option<&str>,
        variables: Option<&Variables>,
    ) -> Option<String> {
        self.with_active(|doc| doc.variation(content_id, variation_id, variables))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use content_session_core::LanguageCodes;
    use serde_json::json;
    use tokio::sync::oneshot;

    use super::*;

    struct StubFetcher {
        bundles: HashMap<LanguageCode, Value>,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                bundles: HashMap::from([
                    ("en".into(), json!({"greeting": "Hello"})),
                    ("fr".into(), json!({"greeting": "Bonjour"})),
                    ("xx".into(), json!("not an object")),
                ]),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        async fn fetch(
            &self,
            _content_key: &str,
            language: &LanguageCode,
        ) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.bundles
                .get(language)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(language.clone()))
        }
    }

    /// Answers with the content key it was asked for; the first call waits on a gate.
    struct GatedFetcher {
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl ContentFetcher for GatedFetcher {
        async fn fetch(
            &self,
            content_key: &str,
            _language: &LanguageCode,
        ) -> Result<Value, FetchError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(json!({"greeting": format!("from {content_key}")}))
        }
    }

    fn config(codes: &[&str], key: &str) -> StorageConfig {
        StorageConfig {
            language_codes: LanguageCodes::new(codes.iter().copied()),
            content_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_requires_init() {
        let store = MemoryContentStore::with_fetcher(StubFetcher::new());
        let err = store.fetch_content(&"en".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotInitialized));
    }

    #[tokio::test]
    async fn test_fetch_scopes_reads_to_language() {
        let fetcher = StubFetcher::new();
        let store = MemoryContentStore::with_fetcher(fetcher.clone());
        store.init_content_storage(&config(&["en", "fr"], "key"));

        store.fetch_content(&"en".into()).await.unwrap();
        assert_eq!(store.get_text("greeting", None).text, "Hello");

        store.fetch_content(&"fr".into()).await.unwrap();
        assert_eq!(store.get_text("greeting", None).text, "Bonjour");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);

        assert!(store.select_language(&"en".into()));
        assert_eq!(store.get_text("greeting", None).text, "Hello");
        assert!(!store.select_language(&"de".into()));
    }

    #[tokio::test]
    async fn test_fetch_unregistered_language() {
        let store = MemoryContentStore::with_fetcher(StubFetcher::new());
        store.init_content_storage(&config(&["en"], "key"));
        let err = store.fetch_content(&"fr".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownLanguage(l) if l == "fr"));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_scope() {
        let store = MemoryContentStore::with_fetcher(StubFetcher::new());
        store.init_content_storage(&config(&["en", "de", "xx"], "key"));
        store.fetch_content(&"en".into()).await.unwrap();

        let err = store.fetch_content(&"de".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(FetchError::NotFound(_))));
        let err = store.fetch_content(&"xx".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(FetchError::Decode(_))));

        assert_eq!(store.active_language(), Some("en".into()));
    }

    #[tokio::test]
    async fn test_fetch_without_fetcher_is_internal_error() {
        let store = MemoryContentStore::new();
        store.init_content_storage(&config(&["en"], "key"));
        let err = store.fetch_content(&"en".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Internal(_)));
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = MemoryContentStore::with_fetcher(StubFetcher::new());
        store.init_content_storage(&config(&["en", "fr"], "key"));
        store.fetch_content(&"en".into()).await.unwrap();

        store.init_content_storage(&config(&["en", "fr"], "key"));
        assert_eq!(store.registrations(), 1);
        assert_eq!(store.get_text("greeting", None).text, "Hello");
    }

    #[tokio::test]
    async fn test_reinit_with_new_key_drops_content() {
        let store = MemoryContentStore::with_fetcher(StubFetcher::new());
        store.init_content_storage(&config(&["en"], "one"));
        store.fetch_content(&"en".into()).await.unwrap();

        store.init_content_storage(&config(&["en"], "two"));
        assert_eq!(store.registrations(), 2);
        assert!(!store.is_loaded(&"en".into()));
        assert_eq!(store.get_text("greeting", None).text, "");
    }

    #[tokio::test]
    async fn test_fetch_for_replaced_key_is_dropped() {
        let (release, gate) = oneshot::channel();
        let store = MemoryContentStore::with_fetcher(Arc::new(GatedFetcher {
            gate: Mutex::new(Some(gate)),
        }));
        store.init_content_storage(&config(&["en"], "old"));

        let en: LanguageCode = "en".into();
        let slow = store.fetch_content(&en);
        let rekey = async {
            tokio::task::yield_now().await;
            store.init_content_storage(&config(&["en"], "new"));
            store.fetch_content(&"en".into()).await.unwrap();
            release.send(()).unwrap();
        };
        let (slow, ()) = tokio::join!(slow, rekey);

        assert!(matches!(slow, Err(StoreError::Superseded(l)) if l == "en"));
        assert_eq!(store.get_text("greeting", None).text, "from new");
    }

    #[tokio::test]
    async fn test_fetch_for_dropped_language_is_dropped() {
        let (release, gate) = oneshot::channel();
        let store = MemoryContentStore::with_fetcher(Arc::new(GatedFetcher {
            gate: Mutex::new(Some(gate)),
        }));
        store.init_content_storage(&config(&["en", "fr"], "key"));

        let fr: LanguageCode = "fr".into();
        let slow = store.fetch_content(&fr);
        let shrink = async {
            tokio::task::yield_now().await;
            store.init_content_storage(&config(&["en"], "key"));
            release.send(()).unwrap();
        };
        let (slow, ()) = tokio::join!(slow, shrink);

        assert!(matches!(slow, Err(StoreError::Superseded(_))));
        assert!(!store.is_loaded(&"fr".into()));
        assert!(store.active_language().is_none());
    }

    #[test]
    fn test_reinit_with_fewer_languages_keeps_survivors() {
        let store = MemoryContentStore::new();
        store.init_content_storage(&config(&["en", "fr"], "key"));
        store.set_content_language(&"en".into(), json!({"a": "A"}));
        store.set_content_language(&"fr".into(), json!({"a": "Á"}));

        store.init_content_storage(&config(&["en"], "key"));
        assert!(store.is_loaded(&"en".into()));
        assert!(!store.is_loaded(&"fr".into()));
        assert!(store.active_language().is_none());
    }

    #[test]
    fn test_reads_before_any_content() {
        let store = MemoryContentStore::new();
        assert_eq!(store.get_text("a", None), TextContent::default());
        assert!(store.get_image("a").data.is_none());
        assert!(store.get_variation("a", None, None).is_none());
    }

    #[test]
    fn test_static_registration_and_reset() {
        let store = MemoryContentStore::new();
        store.set_content_language(
            &"en".into(),
            json!({
                "logo": {"contentstorage_type": "image", "url": "/logo.svg", "altText": "Logo"},
                "cta": {"contentstorage_type": "variation", "data": {"default": "Go"}}
            }),
        );
        assert_eq!(store.get_image("logo").data.unwrap().url, "/logo.svg");
        assert_eq!(store.get_variation("cta", None, None).as_deref(), Some("Go"));

        store.reset();
        assert!(store.active_language().is_none());
        assert!(store.get_image("logo").data.is_none());
    }
}
