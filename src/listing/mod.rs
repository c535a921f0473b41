//! Parsing of log server listing and file pages
//!
//! The log servers render plain directory listings:
//!
//! - the top-level listing links every merchant folder from an `<li>` whose
//!   anchor href contains `session-logs` and whose text is `<merchant_id>/`
//! - a merchant folder lists each log file as an anchor followed, within the
//!   same parent, by a sibling anchor labelled `download`
//! - a file page wraps the raw log text in a single `<pre>` block
//!
//! These functions depend on that markup and nothing else.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::utils::{DOWNLOAD_LABEL, SESSION_LOGS_MARKER};

// Parsed once on first use. The selector text is fixed at compile time.
static MERCHANT_FOLDER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("li > a[href*=\"{SESSION_LOGS_MARKER}\"]"))
        .expect("BUG: hardcoded merchant folder selector is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a").expect("BUG: hardcoded CSS selector 'a' is invalid")
});

/// Text of every merchant folder link on a server's top-level listing
#[must_use]
pub fn merchant_folders(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&MERCHANT_FOLDER_SELECTOR)
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        .collect()
}

/// Whether the top-level listing has a folder for `merchant_id`
#[must_use]
pub fn has_merchant_folder(html: &str, merchant_id: &str) -> bool {
    let wanted = format!("{merchant_id}/");
    merchant_folders(html).iter().any(|folder| *folder == wanted)
}

/// Hrefs of the log files in a merchant folder listing, in document order
///
/// An anchor counts as a file link when a later sibling anchor under the
/// same parent is labelled `download`. Anchors without an href are skipped.
#[must_use]
pub fn log_file_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter(|anchor| precedes_download_anchor(*anchor))
        .filter_map(|anchor| anchor.value().attr("href").map(str::to_string))
        .collect()
}

fn precedes_download_anchor(anchor: ElementRef<'_>) -> bool {
    anchor
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .any(is_download_anchor)
}

fn is_download_anchor(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.text().collect::<String>().trim() == DOWNLOAD_LABEL
}

/// Raw text between the first `<pre>` and the following `</pre>`
///
/// The body is returned verbatim: entities are not decoded and markup inside
/// the block is kept. An unterminated block runs to the end of the page.
/// Returns `None` when the page has no `<pre>` block at all.
#[must_use]
pub fn extract_pre_body(page: &str) -> Option<&str> {
    let (_, rest) = page.split_once("<pre>")?;
    Some(rest.split_once("</pre>").map_or(rest, |(body, _)| body))
}

/// Number of non-overlapping occurrences of `query` in `content`
///
/// An empty query matches nothing.
#[must_use]
pub fn count_occurrences(content: &str, query: &str) -> usize {
    if query.is_empty() {
        return 0;
    }
    content.matches(query).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_LISTING: &str = r#"<html><body>
        <h1>Index of /logs</h1>
        <ul>
            <li><a href="?location=/logs/../">../</a></li>
            <li><a href="?location=/logs/session-logs/1234">1234/</a></li>
            <li><a href="?location=/logs/session-logs/5678">5678/</a></li>
            <li><a href="?location=/logs/archive">12345/</a></li>
        </ul>
        <p><a href="?location=/logs/session-logs/777">777/</a></p>
    </body></html>"#;

    const FOLDER_LISTING: &str = r#"<html><body>
        <ul>
            <li><a href="?location=/logs/1234/a.log">a.log</a> <a href="/dl?f=a.log">download</a></li>
            <li><a href="?location=/logs/1234/b.log">b.log</a> <a href="/dl?f=b.log">download</a></li>
            <li><a href="?location=/logs/1234/readme">readme</a></li>
            <li><a href="/dl?f=c.log">download</a> <a href="?location=/logs/1234/c.log">c.log</a></li>
        </ul>
    </body></html>"#;

    #[test]
    fn test_merchant_folders_only_from_session_logs_list_items() {
        assert_eq!(merchant_folders(SERVER_LISTING), vec!["1234/", "5678/"]);
    }

    #[test]
    fn test_has_merchant_folder_requires_exact_name() {
        assert!(has_merchant_folder(SERVER_LISTING, "1234"));
        assert!(!has_merchant_folder(SERVER_LISTING, "123"));
        assert!(!has_merchant_folder(SERVER_LISTING, "12345"));
        assert!(!has_merchant_folder(SERVER_LISTING, "777"));
        assert!(!has_merchant_folder(SERVER_LISTING, "9999"));
    }

    #[test]
    fn test_log_file_links_are_anchors_before_download() {
        assert_eq!(
            log_file_links(FOLDER_LISTING),
            vec!["?location=/logs/1234/a.log", "?location=/logs/1234/b.log"]
        );
    }

    #[test]
    fn test_log_file_links_empty_folder() {
        assert!(log_file_links("<html><body><ul></ul></body></html>").is_empty());
    }

    #[test]
    fn test_extract_pre_body_is_verbatim() {
        let page = "<html><body><pre>line 1\n&lt;tag&gt; ERROR\n</pre><p>footer</p></body></html>";
        assert_eq!(extract_pre_body(page), Some("line 1\n&lt;tag&gt; ERROR\n"));
    }

    #[test]
    fn test_extract_pre_body_missing_or_unterminated() {
        assert_eq!(extract_pre_body("<html>no block</html>"), None);
        assert_eq!(extract_pre_body("<pre>tail only"), Some("tail only"));
        assert_eq!(extract_pre_body("<pre></pre>"), Some(""));
    }

    #[test]
    fn test_count_occurrences_non_overlapping() {
        assert_eq!(count_occurrences("ERROR x ERROR", "ERROR"), 2);
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("nothing here", "ERROR"), 0);
        assert_eq!(count_occurrences("case Error", "ERROR"), 0);
        assert_eq!(count_occurrences("anything", ""), 0);
    }
}
