//! Hook-style accessors.
//!
//! Read-through helpers over a [`ContentStore`]. They never block on the
//! session: before the first language resolves they return their fallbacks.

use content_session_core::{ContentStore, FetchStatus, ImageData, Variables};

use crate::{
    context::{ContentContext, LanguageManager},
    error::ConfigurationError,
};

/// Text for `content_id`, or the id itself when nothing resolves.
pub fn use_get_text<S>(store: &S, content_id: &str, variables: Option<&Variables>) -> String
where
    S: ContentStore + ?Sized,
{
    let text = store.get_text(content_id, variables).text;
    if text.is_empty() {
        content_id.to_string()
    } else {
        text
    }
}

/// Image for `content_id`, or empty url/alt text when nothing resolves.
pub fn use_get_image<S>(store: &S, content_id: &str) -> ImageData
where
    S: ContentStore + ?Sized,
{
    store.get_image(content_id).data.unwrap_or_default()
}

/// Fetch status of the session.
///
/// # Errors
/// Returns error if used outside a provider.
pub fn use_is_fetching_content<S>(context: &ContentContext<S>) -> Result<FetchStatus, ConfigurationError>
where
    S: ContentStore + ?Sized,
{
    context.status()
}

/// Language list, current language and a switcher that skips no-op switches.
///
/// # Errors
/// Returns error if used outside a provider.
pub fn use_manage_language<S>(
    context: &ContentContext<S>,
) -> Result<LanguageManager<S>, ConfigurationError>
where
    S: ContentStore + ?Sized,
{
    LanguageManager::new(context.clone())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use content_session_store::MemoryContentStore;
    use serde_json::json;

    use super::*;
    use crate::{ContentProvider, ProviderOptions};

    fn store() -> MemoryContentStore {
        let store = MemoryContentStore::new();
        store.set_content_language(
            &"en".into(),
            json!({
                "title": "Hi {{name}}",
                "empty": "",
                "hero": {"contentstorage_type": "image", "url": "/hero.png", "altText": "Hero"}
            }),
        );
        store
    }

    #[test]
    fn test_get_text_with_variables() {
        let vars = Variables::from([("name".to_string(), json!("Ada"))]);
        assert_eq!(use_get_text(&store(), "title", Some(&vars)), "Hi Ada");
    }

    #[test]
    fn test_get_text_falls_back_to_content_id() {
        let store = store();
        assert_eq!(use_get_text(&store, "missing.key", None), "missing.key");
        assert_eq!(use_get_text(&store, "empty", None), "empty");
        assert_eq!(use_get_text(&MemoryContentStore::new(), "title", None), "title");
    }

    #[test]
    fn test_get_image_falls_back_to_empty() {
        let store = store();
        assert_eq!(use_get_image(&store, "hero").url, "/hero.png");
        assert_eq!(use_get_image(&store, "nope"), ImageData::default());
    }

    #[test]
    fn test_accessors_work_through_trait_object() {
        let store: Arc<dyn ContentStore> = Arc::new(store());
        assert_eq!(use_get_text(store.as_ref(), "title", None), "Hi {{name}}");
    }

    #[tokio::test]
    async fn test_fetching_status_hook() {
        let provider = ContentProvider::new(
            Arc::new(MemoryContentStore::new()),
            ProviderOptions::static_content(["en"], HashMap::from([("en".into(), json!({}))])),
        );
        let ctx = provider.context();
        assert_eq!(use_is_fetching_content(&ctx).unwrap(), FetchStatus::Loading);

        provider.initialize().await;
        assert_eq!(use_is_fetching_content(&ctx).unwrap(), FetchStatus::Idle);

        drop(provider);
        assert!(use_is_fetching_content(&ctx).is_err());
        assert!(use_manage_language(&ctx).is_err());
    }

    #[tokio::test]
    async fn test_manage_language_hook() {
        let provider = ContentProvider::mount(
            Arc::new(MemoryContentStore::new()),
            ProviderOptions::static_content(
                ["en", "fr"],
                HashMap::from([("en".into(), json!({})), ("fr".into(), json!({}))]),
            ),
        )
        .await;

        let manager = use_manage_language(&provider.context()).unwrap();
        assert_eq!(manager.current_language_code, Some("en".into()));
        assert_eq!(manager.language_codes.len(), 2);

        manager.set_language("fr").await.unwrap();
        assert_eq!(provider.current_language_code(), Some("fr".into()));
    }
}
