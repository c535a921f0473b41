//! Error types for cache operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Error types for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// An entry for this key already exists; the store never overwrites
    #[error("Cache consistency violation: {merchant_id}/{filename} already exists")]
    AlreadyExists {
        merchant_id: String,
        filename: String,
    },

    /// Local persistence failed
    #[error("Cache I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Merchant id or filename that is empty or would leave its namespace
    #[error("Invalid cache key component: {0:?}")]
    InvalidKey(String),
}

impl CacheError {
    /// Whether this error means two writers raced for the same entry
    #[must_use]
    pub fn is_consistency_violation(&self) -> bool {
        matches!(self, CacheError::AlreadyExists { .. })
    }
}
