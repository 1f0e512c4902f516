//! Content storage for localized content sessions.
//!
//! Provides:
//! - `MemoryContentStore` - Process-wide in-memory store (feature: memory)
//! - `HttpContentFetcher` - Headless bundle fetcher over HTTP (feature: http)

pub mod fetcher;
pub mod storage;

#[cfg(feature = "http")]
pub use fetcher::{HttpContentFetcher, HttpFetcherConfig};
#[cfg(feature = "memory")]
pub use storage::MemoryContentStore;
