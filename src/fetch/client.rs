use futures::FutureExt;
use futures::future::BoxFuture;
use log::debug;
use reqwest::Client;

use super::errors::{FetchError, FetchResult};
use crate::config::SearchConfig;

/// Retrieves listing pages and log file pages by URL
///
/// Implementations must be shareable across worker tasks. Both methods
/// return the raw response text; parsing is the caller's job.
pub trait FetchClient: Send + Sync {
    /// Fetch a server or merchant folder listing page
    fn fetch_listing<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>>;

    /// Fetch the page wrapping one log file
    fn fetch_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>>;
}

/// `reqwest`-backed client used against real log servers
///
/// Uses the transport's default timeouts; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpFetchClient {
    client: Client,
}

impl HttpFetchClient {
    /// Wrap an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Build a client carrying the configured user agent
    pub fn from_config(config: &SearchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(config.user_agent()).build()?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str) -> FetchResult<String> {
        debug!(target: "logsearch::fetch", "GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

impl FetchClient for HttpFetchClient {
    fn fetch_listing<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        self.get_text(url).boxed()
    }

    fn fetch_file<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchResult<String>> {
        self.get_text(url).boxed()
    }
}
