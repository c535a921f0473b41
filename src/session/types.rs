//! Core data types for search sessions

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::SessionError;
use crate::utils::filename_from_url;

/// One discovered log file awaiting processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    url: String,
    filename: String,
}

impl WorkItem {
    /// Derive the cache filename from the last path segment of `url`
    #[must_use]
    pub fn new(url: String) -> Self {
        let filename = filename_from_url(&url).to_string();
        Self { url, filename }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Where a file's content came from during this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Cache,
    Web,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => f.write_str("CACHE"),
            Self::Web => f.write_str("WEB"),
        }
    }
}

/// A committed match: one file that contained the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based, gap-free commit order within the session run
    pub sequence: u64,
    pub url: String,
    /// Non-overlapping occurrences of the query in the file
    pub hit_count: usize,
    pub origin: Origin,
    pub filename: String,
}

impl SearchHit {
    /// One-line summary, e.g. `#0001 | Hits: 0002 | Source: CACHE | a.log`
    #[must_use]
    pub fn display_line(&self) -> String {
        format!(
            "#{:04} | Hits: {:04} | Source: {} | {}",
            self.sequence, self.hit_count, self.origin, self.filename
        )
    }
}

/// Why a session run ended in [`SessionStatus::Failed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionFailure {
    /// The server's listing has no folder for the merchant
    MerchantNotFound { merchant_id: String },
    /// A listing page could not be fetched
    ListingUnavailable { message: String },
    /// The merchant's cache namespace could not be created
    CacheUnavailable { message: String },
}

impl From<&SessionError> for SessionFailure {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::MerchantNotFound { merchant_id, .. } => Self::MerchantNotFound {
                merchant_id: merchant_id.clone(),
            },
            SessionError::Discovery(e) => Self::ListingUnavailable {
                message: e.to_string(),
            },
            SessionError::Cache(e) => Self::CacheUnavailable {
                message: e.to_string(),
            },
        }
    }
}

impl fmt::Display for SessionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MerchantNotFound { merchant_id } => {
                write!(f, "merchant folder {merchant_id} not found")
            }
            Self::ListingUnavailable { message } => write!(f, "listing unavailable: {message}"),
            Self::CacheUnavailable { message } => write!(f, "cache unavailable: {message}"),
        }
    }
}

/// Lifecycle of one session run
///
/// `Idle` only precedes the first run. `Stopped`, `Completed` and `Failed`
/// are terminal for a run; only a restart leaves them. A run that fails after
/// a stop request reports `Failed` rather than `Stopped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Idle,
    Discovering,
    Populating,
    Running,
    Stopped,
    Completed,
    Failed(SessionFailure),
}

impl SessionStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Completed | Self::Failed(_))
    }

    #[must_use]
    pub fn failure(&self) -> Option<&SessionFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Discovering => f.write_str("discovering"),
            Self::Populating => f.write_str("populating"),
            Self::Running => f.write_str("running"),
            Self::Stopped => f.write_str("stopped"),
            Self::Completed => f.write_str("completed"),
            Self::Failed(failure) => write!(f, "failed: {failure}"),
        }
    }
}
