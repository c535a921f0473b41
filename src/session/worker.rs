//! Search worker: claim, resolve, scan, commit
//!
//! A worker loops over the session's work queue until the queue is empty or
//! the stop flag is raised. The flag is only checked between items, so an
//! in-flight fetch always completes before the worker exits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::{debug, warn};

use super::errors::ItemError;
use super::events::{SessionEvent, SessionEvents};
use super::registry::{HitDraft, ResultRegistry};
use super::types::{Origin, SearchHit, WorkItem};
use super::work_queue::WorkQueue;
use crate::cache::LogCache;
use crate::counter::SessionCounters;
use crate::fetch::FetchClient;
use crate::listing::{count_occurrences, extract_pre_body};

/// Everything the workers of one run share
pub(crate) struct WorkerContext {
    pub session_id: usize,
    pub merchant_id: String,
    pub query: String,
    pub queue: WorkQueue,
    pub cache: LogCache,
    pub fetcher: Arc<dyn FetchClient>,
    pub counters: Arc<SessionCounters>,
    pub registry: Arc<ResultRegistry>,
    pub events: SessionEvents,
    pub stop: Arc<AtomicBool>,
}

/// What one worker did before exiting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub processed: usize,
    pub matched: usize,
    pub failed: usize,
    /// The worker left because of the stop flag, not an empty queue
    pub stopped: bool,
}

impl WorkerReport {
    pub(crate) fn absorb(&mut self, other: WorkerReport) {
        self.processed += other.processed;
        self.matched += other.matched;
        self.failed += other.failed;
        self.stopped |= other.stopped;
    }
}

/// Decrements the session's live-worker count when the worker task ends,
/// including by panic.
pub(crate) struct LiveWorkerGuard(Arc<AtomicUsize>);

impl LiveWorkerGuard {
    /// Count one more live worker; the count drops again when the guard does
    pub(crate) fn register(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveWorkerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) async fn run_worker(worker_id: usize, ctx: Arc<WorkerContext>) -> WorkerReport {
    let mut report = WorkerReport::default();

    loop {
        if ctx.stop.load(Ordering::SeqCst) {
            debug!(
                target: "logsearch::worker",
                "Session {} worker {worker_id} observed stop flag", ctx.session_id
            );
            report.stopped = true;
            break;
        }

        let Some(item) = ctx.queue.pop() else {
            break;
        };

        match process_item(&ctx, &item).await {
            Ok(Some(hit)) => {
                debug!(
                    target: "logsearch::worker",
                    "Session {} worker {worker_id}: {}", ctx.session_id, hit.display_line()
                );
                report.matched += 1;
            }
            Ok(None) => {}
            Err(e) => {
                report.failed += 1;
                let violation = e.is_consistency_violation();
                warn!(
                    target: "logsearch::worker",
                    "Session {} worker {worker_id} skipped {}: {e}", ctx.session_id, item.url()
                );
                ctx.events.publish(SessionEvent::item_failed(
                    ctx.session_id,
                    item.url().to_string(),
                    e.to_string(),
                    violation,
                ));
            }
        }
        report.processed += 1;
    }

    report
}

async fn process_item(ctx: &WorkerContext, item: &WorkItem) -> Result<Option<SearchHit>, ItemError> {
    let (content, origin) = resolve_content(ctx, item).await?;

    let hit_count = count_occurrences(&content, &ctx.query);
    if hit_count == 0 {
        return Ok(None);
    }

    let draft = HitDraft {
        url: item.url().to_string(),
        hit_count,
        origin,
        filename: item.filename().to_string(),
    };
    let hit = ctx
        .registry
        .commit(draft, &ctx.counters.results_found, &ctx.events, ctx.session_id);
    Ok(Some(hit))
}

/// Cache first; on a miss fetch the page, keep its `<pre>` body and cache it
async fn resolve_content(ctx: &WorkerContext, item: &WorkItem) -> Result<(String, Origin), ItemError> {
    if let Some(content) = ctx.cache.read(&ctx.merchant_id, item.filename()).await? {
        ctx.counters.cache_hits.increment();
        return Ok((content, Origin::Cache));
    }

    let page = ctx.fetcher.fetch_file(item.url()).await?;
    ctx.counters.network_fetches.increment();

    let body = extract_pre_body(&page)
        .ok_or_else(|| ItemError::MissingPreBlock {
            url: item.url().to_string(),
        })?
        .to_string();

    ctx.cache
        .write(&ctx.merchant_id, item.filename(), body.clone())
        .await?;
    Ok((body, Origin::Web))
}
