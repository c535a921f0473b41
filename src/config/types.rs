//! Core configuration types for merchant log searches
//!
//! This module contains the main `SearchConfig` struct that defines which
//! log servers are searched, where fetched bodies are cached and how many
//! workers each server session runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::{
    DEFAULT_CACHE_DIR, DEFAULT_EVENT_CAPACITY, DEFAULT_SERVERS, DEFAULT_USER_AGENT,
    DEFAULT_WORKER_COUNT,
};

/// Main configuration struct for a set of server sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base listing URL of every log server, one session per entry.
    ///
    /// Order is preserved; session ids are the 1-based position in this list.
    pub(crate) servers: Vec<String>,

    /// Root of the write-once log cache (`<cache_root>/<merchant>/<file>`).
    ///
    /// **INVARIANT:** Always an absolute path once built (normalized in builder).
    pub(crate) cache_root: PathBuf,

    /// Search workers spawned per server session
    /// Default: 5, Range: 1-64
    #[serde(default = "default_worker_count")]
    pub(crate) worker_count: usize,

    /// User agent sent with listing and file requests
    #[serde(default = "default_user_agent")]
    pub(crate) user_agent: String,

    /// Broadcast buffer for session events
    ///
    /// Receivers that fall further behind than this lag and skip events;
    /// `results()` snapshots remain complete regardless.
    #[serde(default = "default_event_capacity")]
    pub(crate) event_capacity: usize,
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            servers: DEFAULT_SERVERS.iter().map(|s| (*s).to_string()).collect(),
            cache_root: PathBuf::from(DEFAULT_CACHE_DIR),
            worker_count: DEFAULT_WORKER_COUNT,
            user_agent: default_user_agent(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SearchConfig {
    /// Load a JSON config file and validate it through the builder
    ///
    /// Only `servers` and `cache_root` are required in the file; the other
    /// fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let parsed: SearchConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Self::builder()
            .servers(parsed.servers)
            .cache_root(parsed.cache_root)
            .worker_count(parsed.worker_count)
            .user_agent(parsed.user_agent)
            .event_capacity(parsed.event_capacity)
            .build()
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
