//! URL helpers for the log server listing layout.
//!
//! Log servers address folders through the query string
//! (`http://host/?location=/logs/<merchant>`) while file links are
//! root-relative, so these helpers work on plain strings rather than
//! resolving through `url::Url::join`, which would drop the query.

use url::Url;

/// The server URL with its query string removed
///
/// `http://host/?location=/logs` becomes `http://host/`.
#[must_use]
pub fn server_root(server: &str) -> &str {
    server.split_once('?').map_or(server, |(root, _)| root)
}

/// Listing URL of one merchant's folder on `server`
#[must_use]
pub fn merchant_folder_url(server: &str, merchant_id: &str) -> String {
    format!("{server}/{merchant_id}")
}

/// Absolute URL of a file link found in a folder listing
#[must_use]
pub fn file_url(server: &str, href: &str) -> String {
    format!("{}{href}", server_root(server))
}

/// Last `/`-separated segment of a URL, used as the cache filename
#[must_use]
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Check that a configured server is an absolute http(s) URL
#[must_use]
pub fn is_valid_server_url(server: &str) -> bool {
    match Url::parse(server) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
