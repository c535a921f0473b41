//! Tests for the type-safe configuration builder and JSON loading

use merchant_logsearch::config::SearchConfig;
use merchant_logsearch::utils::{DEFAULT_EVENT_CAPACITY, DEFAULT_SERVERS, DEFAULT_WORKER_COUNT};
use tempfile::TempDir;

#[test]
fn test_builder_requires_servers_and_cache_root() {
    // These should not compile if uncommented - testing compile-time guarantees
    // let config = SearchConfig::builder().build();
    // let config = SearchConfig::builder().servers(["http://a.test/"]).build();

    let temp_dir = TempDir::new().unwrap();
    let config = SearchConfig::builder()
        .servers(["http://a.test/?location=/logs"])
        .cache_root(temp_dir.path())
        .build()
        .unwrap();

    assert_eq!(config.servers(), ["http://a.test/?location=/logs".to_string()]);
    assert_eq!(config.cache_root(), temp_dir.path());
}

#[test]
fn test_builder_optional_fields_have_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = SearchConfig::builder()
        .servers(["http://a.test/"])
        .cache_root(temp_dir.path())
        .build()
        .unwrap();

    assert_eq!(config.worker_count(), DEFAULT_WORKER_COUNT);
    assert_eq!(config.event_capacity(), DEFAULT_EVENT_CAPACITY);
    assert!(config.user_agent().starts_with("merchant-logsearch"));
}

#[test]
fn test_setters_apply_in_any_state() {
    let temp_dir = TempDir::new().unwrap();
    let config = SearchConfig::builder()
        .worker_count(12)
        .servers(["http://a.test/", "https://b.test/?location=/logs"])
        .user_agent("audit-client/1.0")
        .cache_root(temp_dir.path())
        .event_capacity(64)
        .build()
        .unwrap();

    assert_eq!(config.servers().len(), 2);
    assert_eq!(config.worker_count(), 12);
    assert_eq!(config.user_agent(), "audit-client/1.0");
    assert_eq!(config.event_capacity(), 64);
}

#[test]
fn test_build_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    let empty: [&str; 0] = [];
    assert!(SearchConfig::builder().servers(empty).cache_root(dir).build().is_err());
    assert!(
        SearchConfig::builder()
            .servers(["ftp://a.test/"])
            .cache_root(dir)
            .build()
            .is_err()
    );
    assert!(
        SearchConfig::builder()
            .servers(["not a url"])
            .cache_root(dir)
            .build()
            .is_err()
    );
    for workers in [0, 65] {
        assert!(
            SearchConfig::builder()
                .servers(["http://a.test/"])
                .cache_root(dir)
                .worker_count(workers)
                .build()
                .is_err(),
            "worker_count {workers} should be rejected"
        );
    }
    assert!(
        SearchConfig::builder()
            .servers(["http://a.test/"])
            .cache_root(dir)
            .event_capacity(0)
            .build()
            .is_err()
    );
}

#[test]
fn test_relative_cache_root_becomes_absolute() {
    let config = SearchConfig::builder()
        .servers(["http://a.test/"])
        .cache_root("log_cache")
        .build()
        .unwrap();

    assert!(config.cache_root().is_absolute());
    assert!(config.cache_root().ends_with("log_cache"));
}

#[test]
fn test_default_config_targets_company_servers() {
    let config = SearchConfig::default();
    assert_eq!(config.servers().len(), DEFAULT_SERVERS.len());
    assert_eq!(config.worker_count(), DEFAULT_WORKER_COUNT);
}

#[test]
fn test_json_file_fills_missing_fields_with_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("logsearch.json");
    std::fs::write(
        &path,
        r#"{ "servers": ["http://a.test/?location=/logs"], "cache_root": "cache", "worker_count": 3 }"#,
    )
    .unwrap();

    let config = SearchConfig::from_json_file(&path).unwrap();
    assert_eq!(config.worker_count(), 3);
    assert_eq!(config.event_capacity(), DEFAULT_EVENT_CAPACITY);
    assert!(config.cache_root().is_absolute());
}

#[test]
fn test_json_file_is_validated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "servers": [], "cache_root": "cache" }"#).unwrap();
    assert!(SearchConfig::from_json_file(&path).is_err());

    let missing = temp_dir.path().join("missing.json");
    assert!(SearchConfig::from_json_file(&missing).is_err());
}
