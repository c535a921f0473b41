pub mod cache;
pub mod config;
pub mod counter;
pub mod fetch;
pub mod listing;
pub mod session;
pub mod utils;

pub use cache::{CacheError, LogCache};
pub use config::SearchConfig;
pub use counter::{Counter, CountersSnapshot, SessionCounters};
pub use fetch::{FetchClient, FetchError, HttpFetchClient};
pub use session::{
    ItemError, Origin, SearchHit, SessionCoordinator, SessionError, SessionEvent,
    SessionFailure, SessionSetManager, SessionStatus, WorkItem,
};

/// Search every configured server for `query` in `merchant_id`'s logs and
/// wait for all sessions to finish
pub async fn search(
    config: &SearchConfig,
    merchant_id: &str,
    query: &str,
) -> Result<SessionSetManager, reqwest::Error> {
    let manager = SessionSetManager::from_config(config)?;
    manager.start_all(merchant_id, query).await;
    manager.wait_all_idle().await;
    Ok(manager)
}
