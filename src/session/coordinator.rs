//! Per-server session orchestration
//!
//! A [`SessionCoordinator`] runs one search at a time against one log
//! server:
//! - Discovery of the merchant folder and its log files (two listing fetches)
//! - Population of a one-shot work queue
//! - A fixed-size pool of search workers
//! - Cooperative stop and liveness reporting
//!
//! Starting a new search while one is live stops the old run, waits for every
//! worker to exit, and clears results and counters before anything new runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, error, info};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::errors::SessionError;
use super::events::{SessionEvent, SessionEvents};
use super::registry::ResultRegistry;
use super::types::{SearchHit, SessionFailure, SessionStatus, WorkItem};
use super::work_queue::WorkQueue;
use super::worker::{LiveWorkerGuard, WorkerContext, WorkerReport, run_worker};
use crate::cache::LogCache;
use crate::config::SearchConfig;
use crate::counter::{CountersSnapshot, SessionCounters};
use crate::fetch::FetchClient;
use crate::listing::{has_merchant_folder, log_file_links};
use crate::utils::{IDLE_POLL_INTERVAL, file_url, merchant_folder_url, server_root};

/// Session status that publishes every transition
///
/// Once a run reaches a terminal status, `advance` leaves it alone; only
/// `reset` (at the start of a new run) moves out of it.
struct StatusCell {
    session_id: usize,
    status: RwLock<SessionStatus>,
    events: SessionEvents,
}

impl StatusCell {
    fn get(&self) -> SessionStatus {
        self.status.read().clone()
    }

    fn advance(&self, next: SessionStatus) -> bool {
        let mut status = self.status.write();
        if status.is_terminal() {
            return false;
        }
        *status = next.clone();
        self.events
            .publish(SessionEvent::status_changed(self.session_id, next));
        true
    }

    /// Record a failure; a run that was only asked to stop still reports it
    fn fail(&self, failure: SessionFailure) {
        let mut status = self.status.write();
        if matches!(*status, SessionStatus::Completed | SessionStatus::Failed(_)) {
            return;
        }
        let next = SessionStatus::Failed(failure);
        *status = next.clone();
        self.events
            .publish(SessionEvent::status_changed(self.session_id, next));
    }

    fn reset(&self, next: SessionStatus) {
        let mut status = self.status.write();
        *status = next.clone();
        self.events
            .publish(SessionEvent::status_changed(self.session_id, next));
    }
}

/// Handle on the run currently owned by a coordinator
struct ActiveRun {
    merchant_id: String,
    query: String,
    stop: Arc<AtomicBool>,
    driver: JoinHandle<()>,
}

/// Orchestrates searches against one log server
pub struct SessionCoordinator {
    id: usize,
    server: String,
    cache: LogCache,
    fetcher: Arc<dyn FetchClient>,
    worker_count: usize,
    counters: Arc<SessionCounters>,
    registry: Arc<ResultRegistry>,
    events: SessionEvents,
    status: Arc<StatusCell>,
    live_workers: Arc<AtomicUsize>,
    discovered: Arc<RwLock<Vec<String>>>,
    run: Mutex<Option<ActiveRun>>,
    /// Stop flag of a run that `start` has not launched yet
    pending_stop: Mutex<Option<Arc<AtomicBool>>>,
    restart_lock: tokio::sync::Mutex<()>,
}

impl SessionCoordinator {
    /// Create an idle coordinator
    ///
    /// # Arguments
    /// * `id` - 1-based session id, used in logs and events
    /// * `server` - base listing URL of the log server
    /// * `cache` - local store shared with other sessions
    /// * `fetcher` - network boundary
    /// * `worker_count` - workers per run (at least one is always spawned)
    /// * `event_capacity` - broadcast buffer for [`SessionEvent`]s
    #[must_use]
    pub fn new(
        id: usize,
        server: impl Into<String>,
        cache: LogCache,
        fetcher: Arc<dyn FetchClient>,
        worker_count: usize,
        event_capacity: usize,
    ) -> Self {
        let events = SessionEvents::new(event_capacity.max(1));
        let status = Arc::new(StatusCell {
            session_id: id,
            status: RwLock::new(SessionStatus::Idle),
            events: events.clone(),
        });
        Self {
            id,
            server: server.into(),
            cache,
            fetcher,
            worker_count: worker_count.max(1),
            counters: Arc::new(SessionCounters::new()),
            registry: Arc::new(ResultRegistry::new()),
            events,
            status,
            live_workers: Arc::new(AtomicUsize::new(0)),
            discovered: Arc::new(RwLock::new(Vec::new())),
            run: Mutex::new(None),
            pending_stop: Mutex::new(None),
            restart_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a coordinator for `server` using the config's cache root and pool size
    #[must_use]
    pub fn from_config(
        id: usize,
        server: impl Into<String>,
        config: &SearchConfig,
        fetcher: Arc<dyn FetchClient>,
    ) -> Self {
        Self::new(
            id,
            server,
            LogCache::new(config.cache_root().clone()),
            fetcher,
            config.worker_count(),
            config.event_capacity(),
        )
    }

    /// Start (or restart) a search for `query` in `merchant_id`'s logs
    ///
    /// Returns once the new run has been launched; discovery and searching
    /// continue in the background. A live previous run is stopped and fully
    /// drained first, then results, counters and discovered files are reset.
    /// A `stop()` issued while the previous run drains applies to the new
    /// run, which then ends as `Stopped` before any discovery.
    pub async fn start(&self, merchant_id: &str, query: &str) {
        let _restart = self.restart_lock.lock().await;
        let stop = Arc::new(AtomicBool::new(false));

        if self.is_busy() {
            info!(
                target: "logsearch::session",
                "Session {} restarting: stopping previous run", self.id
            );
            self.stop();
            *self.pending_stop.lock() = Some(Arc::clone(&stop));
            self.wait_idle().await;
        }

        self.registry.clear();
        self.counters.reset();
        self.discovered.write().clear();
        self.status.reset(SessionStatus::Discovering);

        let context = RunContext {
            session_id: self.id,
            server: self.server.clone(),
            merchant_id: merchant_id.to_string(),
            query: query.to_string(),
            cache: self.cache.clone(),
            fetcher: Arc::clone(&self.fetcher),
            worker_count: self.worker_count,
            counters: Arc::clone(&self.counters),
            registry: Arc::clone(&self.registry),
            events: self.events.clone(),
            status: Arc::clone(&self.status),
            live_workers: Arc::clone(&self.live_workers),
            discovered: Arc::clone(&self.discovered),
            stop: Arc::clone(&stop),
        };

        let mut run = self.run.lock();
        self.pending_stop.lock().take();
        *run = Some(ActiveRun {
            merchant_id: merchant_id.to_string(),
            query: query.to_string(),
            stop,
            driver: tokio::spawn(drive_run(context)),
        });
    }

    /// Ask the current run to stop
    ///
    /// Workers finish the item they are on and exit at their next poll.
    /// Nothing is aborted. Has no effect when no run is live or pending.
    pub fn stop(&self) {
        let run = self.run.lock();
        let mut requested = false;
        if let Some(run) = run.as_ref()
            && !run.driver.is_finished()
        {
            run.stop.store(true, Ordering::SeqCst);
            requested = true;
        }
        if let Some(pending) = self.pending_stop.lock().as_ref() {
            pending.store(true, Ordering::SeqCst);
            requested = true;
        }
        if requested {
            self.status.advance(SessionStatus::Stopped);
            info!(target: "logsearch::session", "Session {} stop requested", self.id);
        }
    }

    /// Whether at least one search worker is still running
    #[must_use]
    pub fn any_worker_alive(&self) -> bool {
        self.live_workers.load(Ordering::SeqCst) > 0
    }

    /// Whether a run is in progress, including discovery before any worker exists
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.run
            .lock()
            .as_ref()
            .is_some_and(|run| !run.driver.is_finished())
    }

    /// Resolve once the current run (if any) has fully ended
    pub async fn wait_idle(&self) {
        while self.is_busy() {
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
    }

    /// Stop the current run and wait for it to drain
    pub async fn shutdown(&self) {
        self.stop();
        self.wait_idle().await;
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Server URL without its query string, for display
    #[must_use]
    pub fn server_label(&self) -> &str {
        server_root(&self.server)
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status.get()
    }

    #[must_use]
    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    /// Results of the current or last run, in sequence order
    #[must_use]
    pub fn results(&self) -> Vec<SearchHit> {
        self.registry.snapshot()
    }

    /// File URLs discovered by the current or last run, in listing order
    #[must_use]
    pub fn discovered_files(&self) -> Vec<String> {
        self.discovered.read().clone()
    }

    /// Merchant id of the current or last run
    #[must_use]
    pub fn merchant_id(&self) -> Option<String> {
        self.run.lock().as_ref().map(|run| run.merchant_id.clone())
    }

    /// Query of the current or last run
    #[must_use]
    pub fn query(&self) -> Option<String> {
        self.run.lock().as_ref().map(|run| run.query.clone())
    }

    /// Receive this session's events from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Everything a run's driver task needs, detached from the coordinator
struct RunContext {
    session_id: usize,
    server: String,
    merchant_id: String,
    query: String,
    cache: LogCache,
    fetcher: Arc<dyn FetchClient>,
    worker_count: usize,
    counters: Arc<SessionCounters>,
    registry: Arc<ResultRegistry>,
    events: SessionEvents,
    status: Arc<StatusCell>,
    live_workers: Arc<AtomicUsize>,
    discovered: Arc<RwLock<Vec<String>>>,
    stop: Arc<AtomicBool>,
}

impl RunContext {
    fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn fail(&self, error: &SessionError, started: Instant) {
        error!(
            target: "logsearch::session",
            "Session {} failed for merchant {}: {error}", self.session_id, self.merchant_id
        );
        self.status.fail(SessionFailure::from(error));
        self.summarize(started);
    }

    /// Record the run's outcome and publish the summary
    fn finish(&self, outcome: SessionStatus, started: Instant) {
        self.status.advance(outcome);
        self.summarize(started);
    }

    fn summarize(&self, started: Instant) {
        let status = self.status.get();
        let counters = self.counters.snapshot();
        info!(
            target: "logsearch::session",
            "Session {} {status} in {:.2?}: {} results, {} cache reads, {} requests",
            self.session_id,
            started.elapsed(),
            counters.results_found,
            counters.cache_hits,
            counters.network_fetches
        );
        self.events
            .publish(SessionEvent::finished(self.session_id, status, counters));
    }
}

async fn drive_run(run: RunContext) {
    let started = Instant::now();
    if run.is_stopped() {
        run.finish(SessionStatus::Stopped, started);
        return;
    }
    info!(
        target: "logsearch::session",
        "Session {} searching {} for merchant {}", run.session_id, run.server, run.merchant_id
    );

    let items = match discover(&run).await {
        Ok(Some(items)) => items,
        Ok(None) => {
            run.finish(SessionStatus::Stopped, started);
            return;
        }
        Err(e) => {
            run.fail(&e, started);
            return;
        }
    };

    run.status.advance(SessionStatus::Populating);
    *run.discovered.write() = items.iter().map(|item| item.url().to_string()).collect();

    if let Err(e) = run.cache.ensure_namespace(&run.merchant_id).await {
        run.fail(&SessionError::from(e), started);
        return;
    }

    let queue = WorkQueue::populate(items);
    info!(
        target: "logsearch::session",
        "Session {} queued {} files", run.session_id, queue.total()
    );

    if run.is_stopped() {
        run.finish(SessionStatus::Stopped, started);
        return;
    }
    run.status.advance(SessionStatus::Running);

    let context = Arc::new(WorkerContext {
        session_id: run.session_id,
        merchant_id: run.merchant_id.clone(),
        query: run.query.clone(),
        queue,
        cache: run.cache.clone(),
        fetcher: Arc::clone(&run.fetcher),
        counters: Arc::clone(&run.counters),
        registry: Arc::clone(&run.registry),
        events: run.events.clone(),
        stop: Arc::clone(&run.stop),
    });

    let mut workers = FuturesUnordered::new();
    for worker_id in 1..=run.worker_count {
        let guard = LiveWorkerGuard::register(&run.live_workers);
        let context = Arc::clone(&context);
        workers.push(tokio::spawn(async move {
            let _guard = guard;
            run_worker(worker_id, context).await
        }));
    }

    let mut totals = WorkerReport::default();
    while let Some(joined) = workers.next().await {
        match joined {
            Ok(report) => totals.absorb(report),
            Err(e) => error!(
                target: "logsearch::session",
                "Session {} worker task failed: {e}", run.session_id
            ),
        }
    }
    debug!(
        target: "logsearch::session",
        "Session {} workers done: {totals:?}", run.session_id
    );

    let outcome = if run.is_stopped() {
        SessionStatus::Stopped
    } else {
        SessionStatus::Completed
    };
    run.finish(outcome, started);
}

/// Find the merchant's log files on the server
///
/// Returns `Ok(None)` when the run was stopped between the two listing
/// fetches.
async fn discover(run: &RunContext) -> Result<Option<Vec<WorkItem>>, SessionError> {
    let listing = run.fetcher.fetch_listing(&run.server).await?;
    if !has_merchant_folder(&listing, &run.merchant_id) {
        return Err(SessionError::MerchantNotFound {
            merchant_id: run.merchant_id.clone(),
            server: run.server.clone(),
        });
    }

    if run.is_stopped() {
        return Ok(None);
    }

    let folder_url = merchant_folder_url(&run.server, &run.merchant_id);
    let folder = run.fetcher.fetch_listing(&folder_url).await?;
    let items = log_file_links(&folder)
        .iter()
        .map(|href| WorkItem::new(file_url(&run.server, href)))
        .collect();
    Ok(Some(items))
}
