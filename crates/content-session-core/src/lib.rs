//! Core abstractions for localized content sessions.
//!
//! This crate provides the fundamental building blocks:
//! - `LanguageCode` / `LanguageCodes` - Ordered language configuration
//! - `SessionState` / `FetchStatus` / `ContentMode` - Session data model
//! - `ContentDocument` - Per-language content and its item shapes
//! - `StateChannel` - Latest snapshot + broadcast for session readers
//! - Store and fetcher traits

pub mod document;
pub mod language;
pub mod state;
pub mod state_channel;
pub mod traits;

pub use document::{ContentDocument, ImageContent, ImageData, TextContent, Variables};
pub use language::{LanguageCode, LanguageCodes};
pub use state::{ContentMode, FetchStatus, SessionState};
pub use state_channel::StateChannel;
pub use traits::{ContentFetcher, ContentStore, FetchError, StorageConfig, StoreError};
