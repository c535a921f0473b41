//! Ordered, session-wide collection of committed results

use parking_lot::Mutex;

use super::events::{SessionEvent, SessionEvents};
use super::types::{Origin, SearchHit};
use crate::counter::Counter;

/// Match details a worker hands to the registry for numbering
#[derive(Debug, Clone)]
pub struct HitDraft {
    pub url: String,
    pub hit_count: usize,
    pub origin: Origin,
    pub filename: String,
}

/// Results of one session, numbered at commit time
///
/// `commit` is the session's single serialization point: the sequence
/// number, the `results_found` increment and the `ResultFound` event all
/// happen under one lock, so sequences are gap-free and observers receive
/// them in order.
#[derive(Debug, Default)]
pub struct ResultRegistry {
    hits: Mutex<Vec<SearchHit>>,
}

impl ResultRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(
        &self,
        draft: HitDraft,
        results_found: &Counter,
        events: &SessionEvents,
        session_id: usize,
    ) -> SearchHit {
        let mut hits = self.hits.lock();
        let hit = SearchHit {
            sequence: hits.len() as u64 + 1,
            url: draft.url,
            hit_count: draft.hit_count,
            origin: draft.origin,
            filename: draft.filename,
        };
        hits.push(hit.clone());
        results_found.increment();
        events.publish(SessionEvent::result_found(session_id, hit.clone()));
        hit
    }

    /// Copy of all results in sequence order
    #[must_use]
    pub fn snapshot(&self) -> Vec<SearchHit> {
        self.hits.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.lock().is_empty()
    }

    /// Drop all results; only called between runs
    pub(crate) fn clear(&self) {
        self.hits.lock().clear();
    }
}
