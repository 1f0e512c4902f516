//! Component-style projections.

use content_session_core::{ContentStore, Variables};
use serde::Serialize;

/// What an image component renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageView {
    /// A real image.
    Image { src: String, alt: String },
    /// No image resolved; the bare content id is shown instead.
    Placeholder { content_id: String },
}

/// Text as the store resolves it, without a fallback.
pub fn render_text<S>(store: &S, content_id: &str, variables: Option<&Variables>) -> String
where
    S: ContentStore + ?Sized,
{
    store.get_text(content_id, variables).text
}

/// Image, or the content id as plain text.
pub fn render_image<S>(store: &S, content_id: &str) -> ImageView
where
    S: ContentStore + ?Sized,
{
    match store.get_image(content_id).data {
        Some(data) => ImageView::Image {
            src: data.url,
            alt: data.alt_text,
        },
        None => ImageView::Placeholder {
            content_id: content_id.to_string(),
        },
    }
}

/// Variation value, or the content id.
pub fn render_variation<S>(
    store: &S,
    content_id: &str,
    variation_id: Option<&str>,
    variables: Option<&Variables>,
) -> String
where
    S: ContentStore + ?Sized,
{
    store
        .get_variation(content_id, variation_id, variables)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| content_id.to_string())
}
