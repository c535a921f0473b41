//! Builder methods available for all states
//!
//! Optional settings can be applied at any point of the typestate chain.

use super::builder::SearchConfigBuilder;

impl<State> SearchConfigBuilder<State> {
    /// Number of search workers spawned per server session (1-64, default 5)
    #[must_use]
    pub fn worker_count(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Capacity of each session's event broadcast channel
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
