//! Test utilities and helper functions for the merchant log search test suite

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use merchant_logsearch::fetch::{FetchClient, FetchError, FetchResult};
use merchant_logsearch::session::SessionEvent;
use parking_lot::Mutex;
use tokio::sync::{Barrier, Semaphore, broadcast};

/// Listing URL of the fake log server
#[allow(dead_code)]
pub const SERVER: &str = "http://logs.test/?location=/logs";

/// Second fake log server, for multi-session tests
#[allow(dead_code)]
pub const OTHER_SERVER: &str = "http://logs2.test/?location=/logs";

/// Upper bound for any wait in the suite
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// In-memory `FetchClient` serving canned pages
///
/// Unknown URLs answer with a 404 status error. File fetches can be held
/// back with a semaphore gate or lined up with a barrier.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeFetcher {
    pages: Mutex<HashMap<String, String>>,
    failing: Mutex<HashMap<String, u16>>,
    calls: Mutex<HashMap<String, usize>>,
    listing_gate: Option<Arc<Semaphore>>,
    file_gate: Option<Arc<Semaphore>>,
    file_barrier: Option<Arc<Barrier>>,
}

#[allow(dead_code)]
impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing fetches wait for a permit from `gate`; each permit is consumed
    pub fn with_listing_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.listing_gate = Some(gate);
        self
    }

    /// File fetches wait for a permit from `gate`; each permit is consumed
    pub fn with_file_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.file_gate = Some(gate);
        self
    }

    /// File fetches wait until `barrier` is full before answering
    pub fn with_file_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.file_barrier = Some(barrier);
        self
    }

    pub fn page(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.pages.lock().insert(url.into(), body.into());
        self
    }

    /// Answer `url` with an HTTP error status
    pub fn fail(&self, url: impl Into<String>, status: u16) -> &Self {
        self.failing.lock().insert(url.into(), status);
        self
    }

    /// Requests made for `url` so far
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }

    /// Requests made for log files (anything but listings) so far
    pub fn file_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(url, _)| url.ends_with(".log"))
            .map(|(_, count)| count)
            .sum()
    }

    fn respond(&self, url: &str) -> FetchResult<String> {
        *self.calls.lock().entry(url.to_string()).or_default() += 1;
        if let Some(status) = self.failing.lock().get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }
        self.pages.lock().get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

impl FetchClient for FakeFetcher {
    fn fetch_listing<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        async move {
            let response = self.respond(url);
            if let Some(gate) = &self.listing_gate
                && let Ok(permit) = gate.acquire().await
            {
                permit.forget();
            }
            response
        }
        .boxed()
    }

    fn fetch_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        async move {
            let response = self.respond(url);
            if let Some(gate) = &self.file_gate
                && let Ok(permit) = gate.acquire().await
            {
                permit.forget();
            }
            if let Some(barrier) = &self.file_barrier {
                barrier.wait().await;
            }
            response
        }
        .boxed()
    }
}

/// Top-level server listing with one folder per merchant
#[allow(dead_code)]
pub fn server_listing(merchants: &[&str]) -> String {
    let items: String = merchants
        .iter()
        .map(|m| format!("<li><a href=\"?location=/logs/session-logs/{m}\">{m}/</a></li>\n"))
        .collect();
    format!("<html><body><h1>Index of /logs</h1><ul>\n{items}</ul></body></html>")
}

/// Merchant folder listing whose entries are file anchors followed by a
/// `download` anchor
#[allow(dead_code)]
pub fn folder_listing(hrefs: &[String]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!("<li><a href=\"{href}\">file</a> <a href=\"/download{href}\">download</a></li>\n")
        })
        .collect();
    format!("<html><body><ul>\n{items}</ul></body></html>")
}

/// File page wrapping `body` in a `<pre>` block
#[allow(dead_code)]
pub fn file_page(body: &str) -> String {
    format!("<html><body><h2>log</h2><pre>{body}</pre><p>end</p></body></html>")
}

/// Href of `filename` in `merchant`'s folder on the fake servers
#[allow(dead_code)]
pub fn file_href(merchant: &str, filename: &str) -> String {
    format!("?location=/logs/{merchant}/{filename}")
}

/// Absolute URL the engine derives for `file_href(merchant, filename)`
#[allow(dead_code)]
pub fn file_url_on(server: &str, merchant: &str, filename: &str) -> String {
    format!(
        "{}{}",
        merchant_logsearch::utils::server_root(server),
        file_href(merchant, filename)
    )
}

/// Serve a merchant folder holding `files` (name, body) on `server`
#[allow(dead_code)]
pub fn serve_merchant(fetcher: &FakeFetcher, server: &str, merchant: &str, files: &[(&str, &str)]) {
    let hrefs: Vec<String> = files.iter().map(|(name, _)| file_href(merchant, name)).collect();
    fetcher.page(format!("{server}/{merchant}"), folder_listing(&hrefs));
    for (name, body) in files {
        fetcher.page(file_url_on(server, merchant, name), file_page(body));
    }
}

/// Fail the test if `future` does not finish within [`TEST_TIMEOUT`]
#[allow(dead_code)]
pub async fn within_timeout<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(TEST_TIMEOUT, future)
        .await
        .expect("operation timed out")
}

/// Poll `condition` until it holds, failing after [`TEST_TIMEOUT`]
#[allow(dead_code)]
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    within_timeout(async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

/// Receive events until the session publishes `Finished`
#[allow(dead_code)]
pub async fn collect_until_finished(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    within_timeout(async {
        let mut events = Vec::new();
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let done = matches!(event, SessionEvent::Finished { .. });
                    events.push(event);
                    if done {
                        return events;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return events,
            }
        }
    })
    .await
}
