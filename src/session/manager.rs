//! Session set manager
//!
//! Owns one [`SessionCoordinator`] per configured log server. All sessions
//! share a fetch client and a cache root; the cache's no-clobber writes keep
//! concurrent sessions from corrupting each other's entries.
//!
//! # Lifecycle
//! - Sessions are created idle, one per server, with 1-based ids
//! - `start_all()` starts (or restarts) every session with the same request
//! - `stop_all()` raises every session's stop flag without waiting
//! - `shutdown()` stops every session and waits for all workers to exit

use std::sync::Arc;

use futures::future::join_all;
use log::info;

use super::coordinator::SessionCoordinator;
use crate::config::SearchConfig;
use crate::fetch::{FetchClient, HttpFetchClient};

/// Manager for the set of per-server search sessions
#[derive(Clone)]
pub struct SessionSetManager {
    sessions: Vec<Arc<SessionCoordinator>>,
}

impl SessionSetManager {
    /// Create one idle session per configured server
    #[must_use]
    pub fn new(config: &SearchConfig, fetcher: Arc<dyn FetchClient>) -> Self {
        let sessions = config
            .servers()
            .iter()
            .enumerate()
            .map(|(index, server)| {
                Arc::new(SessionCoordinator::from_config(
                    index + 1,
                    server.clone(),
                    config,
                    Arc::clone(&fetcher),
                ))
            })
            .collect();
        Self { sessions }
    }

    /// Create sessions backed by an HTTP client built from `config`
    pub fn from_config(config: &SearchConfig) -> Result<Self, reqwest::Error> {
        let fetcher = HttpFetchClient::from_config(config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    /// Start the same search on every server
    ///
    /// Sessions that are mid-run are restarted. Returns once every session
    /// has launched its new run.
    pub async fn start_all(&self, merchant_id: &str, query: &str) {
        info!(
            target: "logsearch::manager",
            "Starting search for merchant {merchant_id} on {} servers", self.sessions.len()
        );
        join_all(
            self.sessions
                .iter()
                .map(|session| session.start(merchant_id, query)),
        )
        .await;
    }

    /// Raise every session's stop flag
    pub fn stop_all(&self) {
        for session in &self.sessions {
            session.stop();
        }
    }

    /// Whether any session still has a run in progress
    #[must_use]
    pub fn any_session_busy(&self) -> bool {
        self.sessions.iter().any(|session| session.is_busy())
    }

    /// Resolve once every session has fully drained
    pub async fn wait_all_idle(&self) {
        join_all(self.sessions.iter().map(|session| session.wait_idle())).await;
    }

    /// Stop all sessions and wait for their workers to exit
    pub async fn shutdown(&self) {
        info!(target: "logsearch::manager", "Shutting down {} sessions", self.sessions.len());
        self.stop_all();
        self.wait_all_idle().await;
    }

    #[must_use]
    pub fn sessions(&self) -> &[Arc<SessionCoordinator>] {
        &self.sessions
    }

    /// Look up a session by its 1-based id
    #[must_use]
    pub fn session(&self, id: usize) -> Option<&Arc<SessionCoordinator>> {
        self.sessions.iter().find(|session| session.id() == id)
    }
}
