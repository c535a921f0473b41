//! Error types for session runs and individual work items

use thiserror::Error;

use crate::cache::CacheError;
use crate::fetch::FetchError;

/// Failures that end a whole session run
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server's top-level listing has no folder for the merchant
    #[error("Merchant folder {merchant_id}/ not found on {server}")]
    MerchantNotFound { merchant_id: String, server: String },

    /// A listing page could not be fetched
    #[error("Listing discovery failed: {0}")]
    Discovery(#[from] FetchError),

    /// The merchant's cache namespace could not be prepared
    #[error("Cache namespace unavailable: {0}")]
    Cache(#[from] CacheError),
}

/// Failures confined to one work item; the owning worker moves on
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The file page did not contain a `<pre>` block
    #[error("No <pre> block in {url}")]
    MissingPreBlock { url: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ItemError {
    /// Whether a write raced another writer for the same cache entry
    #[must_use]
    pub fn is_consistency_violation(&self) -> bool {
        matches!(self, ItemError::Cache(e) if e.is_consistency_violation())
    }
}
