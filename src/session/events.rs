//! Session event definitions and broadcast channel
//!
//! Each session owns one broadcast channel. Observers subscribe to receive
//! status transitions, results as they are committed, per-item failures and
//! a final summary once the run drains.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{SearchHit, SessionStatus};
use crate::counter::CountersSnapshot;

/// Events emitted during a session run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The session moved to a new lifecycle state
    StatusChanged {
        session_id: usize,
        status: SessionStatus,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// A result was committed; events arrive in sequence order
    ResultFound {
        session_id: usize,
        hit: SearchHit,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// One work item was skipped after an error
    ItemFailed {
        session_id: usize,
        url: String,
        reason: String,
        consistency_violation: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    /// The run ended and every worker has exited
    Finished {
        session_id: usize,
        status: SessionStatus,
        counters: CountersSnapshot,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Helper functions for creating events
impl SessionEvent {
    #[must_use]
    pub fn status_changed(session_id: usize, status: SessionStatus) -> Self {
        Self::StatusChanged {
            session_id,
            status,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn result_found(session_id: usize, hit: SearchHit) -> Self {
        Self::ResultFound {
            session_id,
            hit,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn item_failed(
        session_id: usize,
        url: String,
        reason: String,
        consistency_violation: bool,
    ) -> Self {
        Self::ItemFailed {
            session_id,
            url,
            reason,
            consistency_violation,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn finished(session_id: usize, status: SessionStatus, counters: CountersSnapshot) -> Self {
        Self::Finished {
            session_id,
            status,
            counters,
            timestamp: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> usize {
        match self {
            Self::StatusChanged { session_id, .. }
            | Self::ResultFound { session_id, .. }
            | Self::ItemFailed { session_id, .. }
            | Self::Finished { session_id, .. } => *session_id,
        }
    }
}

/// Broadcast sender shared by a coordinator and its workers
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Send to current subscribers; having none is not an error
    pub fn publish(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            log::trace!(target: "logsearch::events", "No subscribers for session event");
        }
    }
}
