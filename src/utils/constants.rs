//! Shared configuration constants for merchant log searches
//!
//! Default values and markup markers used throughout the codebase, kept in
//! one place to avoid magic strings in the discovery and worker paths.

use std::time::Duration;

/// Default number of search workers spawned per server session
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Upper bound accepted by the config builder for `worker_count`
pub const MAX_WORKER_COUNT: usize = 64;

/// Default cache root, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = "log_cache";

/// Substring that identifies merchant folder links on a server's top-level listing
pub const SESSION_LOGS_MARKER: &str = "session-logs";

/// Anchor label that follows every downloadable log file link in a folder listing
pub const DOWNLOAD_LABEL: &str = "download";

/// Buffered session events per subscriber before slow receivers start lagging
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// User agent sent with every listing and file request
pub const DEFAULT_USER_AGENT: &str = concat!("merchant-logsearch/", env!("CARGO_PKG_VERSION"));

/// Log servers searched when no configuration overrides them
pub const DEFAULT_SERVERS: &[&str] = &[
    "http://log.server1.company.com/?location=/logs",
    "http://log.server2.company.com/?location=/logs",
];

/// How often `wait_idle` re-checks session liveness
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(25);
