//! Type-safe builder for `SearchConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that the server list and cache root are set before building.

use anyhow::{Context, Result, anyhow, bail};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::SearchConfig;
use crate::utils::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_USER_AGENT, DEFAULT_WORKER_COUNT, MAX_WORKER_COUNT,
    is_valid_server_url,
};

// Type states for the builder
pub struct WithServers;
pub struct Complete;

pub struct SearchConfigBuilder<State = ()> {
    pub(crate) servers: Vec<String>,
    pub(crate) cache_root: Option<PathBuf>,
    pub(crate) worker_count: usize,
    pub(crate) user_agent: String,
    pub(crate) event_capacity: usize,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for SearchConfigBuilder<()> {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            cache_root: None,
            worker_count: DEFAULT_WORKER_COUNT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            _phantom: PhantomData,
        }
    }
}

impl SearchConfig {
    /// Create a builder for configuring a `SearchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> SearchConfigBuilder<()> {
        SearchConfigBuilder::default()
    }
}

impl<State> SearchConfigBuilder<State> {
    fn transition<Next>(self) -> SearchConfigBuilder<Next> {
        SearchConfigBuilder {
            servers: self.servers,
            cache_root: self.cache_root,
            worker_count: self.worker_count,
            user_agent: self.user_agent,
            event_capacity: self.event_capacity,
            _phantom: PhantomData,
        }
    }
}

impl SearchConfigBuilder<()> {
    pub fn servers<I, S>(mut self, servers: I) -> SearchConfigBuilder<WithServers>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = servers.into_iter().map(Into::into).collect();
        self.transition()
    }
}

impl SearchConfigBuilder<WithServers> {
    pub fn cache_root(mut self, dir: impl Into<PathBuf>) -> SearchConfigBuilder<Complete> {
        self.cache_root = Some(dir.into());
        self.transition()
    }
}

impl SearchConfigBuilder<Complete> {
    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Fails when the server list is empty, a server is not an absolute
    /// http(s) URL, `worker_count` is outside 1-64, `event_capacity` is zero,
    /// or the cache root cannot be made absolute.
    pub fn build(self) -> Result<SearchConfig> {
        if self.servers.is_empty() {
            bail!("At least one log server must be configured");
        }
        if let Some(bad) = self.servers.iter().find(|s| !is_valid_server_url(s)) {
            bail!("Invalid log server URL '{bad}': expected an absolute http(s) URL");
        }
        if !(1..=MAX_WORKER_COUNT).contains(&self.worker_count) {
            bail!(
                "worker_count must be between 1 and {MAX_WORKER_COUNT}, got {}",
                self.worker_count
            );
        }
        if self.event_capacity == 0 {
            bail!("event_capacity must be greater than zero");
        }

        let cache_root = self
            .cache_root
            .ok_or_else(|| anyhow!("cache_root is required"))?;
        let cache_root = std::path::absolute(&cache_root).with_context(|| {
            format!("Failed to resolve cache root {}", cache_root.display())
        })?;

        Ok(SearchConfig {
            servers: self.servers,
            cache_root,
            worker_count: self.worker_count,
            user_agent: self.user_agent,
            event_capacity: self.event_capacity,
        })
    }
}
