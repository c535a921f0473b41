//! Getter methods for `SearchConfig`

use std::path::PathBuf;

use super::types::SearchConfig;

impl SearchConfig {
    #[must_use]
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    #[must_use]
    pub fn cache_root(&self) -> &PathBuf {
        &self.cache_root
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}
