//! Typed errors for the discovery library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Variants follow the
//! pipeline's failure taxonomy: input errors fail a job immediately,
//! empty-stage errors name the stage that produced nothing, provider and
//! completion faults are caught at the smallest possible scope, and storage
//! errors fail the job so partial extraction is never silently discarded.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Referenced category is missing or owned by someone else.
    #[error("gift category {category_id} not found for owner {owner_id}")]
    CategoryNotFound { category_id: Uuid, owner_id: Uuid },

    /// Name extraction produced nothing to search for.
    #[error("no products found")]
    NoProductNames,

    /// Every search fan-out came back empty.
    #[error("no search results for any product name")]
    NoSearchHits,

    /// Every selected URL failed metadata extraction.
    #[error("could not extract metadata for any product")]
    AllExtractionsFailed,

    /// A concrete backend failed; caught per-provider by the orchestrators.
    #[error("provider {provider} failed: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Text-completion capability unavailable or failed outright.
    #[error("completion request failed: {0}")]
    Completion(String),

    /// Completion answered, but not with the structure we asked for.
    #[error("malformed completion response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Notification delivery failed. Logged by callers, never escalated
    /// into a job failure.
    #[error("notification error: {0}")]
    Notify(String),

    /// Configuration error (missing API key, bad environment).
    #[error("config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    /// Wrap a storage-layer error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
