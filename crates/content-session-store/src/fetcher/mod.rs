//! Content fetcher implementations.

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{HttpContentFetcher, HttpFetcherConfig};
