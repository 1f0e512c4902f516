//! Print localized content for every configured language.
//!
//! Run with: cargo run -p content-cli -- options.json home.title home.hero
//!
//! Headless options fetch from `CONTENT_BASE_URL` (a `.env` file is read if
//! present).

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use content_session::{
    ContentError, ContentProvider, FetchStatus, ImageView, ProviderOptions, render_image,
    use_get_text,
};
use content_session_store::{HttpContentFetcher, HttpFetcherConfig, MemoryContentStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(options_path) = args.next() else {
        bail!("usage: content-cli <options.json> <content-id>...");
    };
    let content_ids: Vec<String> = args.collect();

    let options = ProviderOptions::from_json_file(&options_path)
        .with_context(|| format!("Failed to load provider options from {options_path}"))?
        .on_error(|e: &ContentError| tracing::warn!("Content error: {e}"));

    let fetcher = HttpContentFetcher::new(HttpFetcherConfig::from_env())
        .context("Failed to build HTTP content fetcher")?;
    let store = Arc::new(MemoryContentStore::with_fetcher(Arc::new(fetcher)));

    let provider = ContentProvider::mount(Arc::clone(&store), options).await;
    tracing::info!(session = %provider.id(), "Provider mounted");
    let languages = provider.language_codes();
    if languages.is_empty() {
        bail!("Provider options list no language codes");
    }

    for language in &languages {
        provider.set_language(language.clone()).await;
        if provider.status() == FetchStatus::Failed {
            println!("[{language}] <unavailable>");
            continue;
        }

        for content_id in &content_ids {
            let value = match render_image(store.as_ref(), content_id) {
                ImageView::Image { src, alt } => format!("<img src=\"{src}\" alt=\"{alt}\">"),
                ImageView::Placeholder { .. } => use_get_text(store.as_ref(), content_id, None),
            };
            println!("[{language}] {content_id} = {value}");
        }
    }

    Ok(())
}
