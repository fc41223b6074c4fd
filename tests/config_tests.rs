//! Configuration loading tests

use std::fs;
use std::time::Duration;

use fdfs_tracker::protocol::Charset;
use fdfs_tracker::{ClientConfig, TrackerEndpoint, TrackerError};
use tempfile::TempDir;

// =============================================================================
// TOML Loading
// =============================================================================

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tracker.toml");
    fs::write(
        &path,
        r#"
connect_timeout = 3
network_timeout = 10
charset = "UTF-8"

[[trackers]]
ip = "192.168.0.10"
port = 22122

[[trackers]]
ip = " 192.168.0.11 "
port = 22123
"#,
    )
    .unwrap();

    let config = ClientConfig::from_file(&path).unwrap();

    assert_eq!(config.connect_timeout, Duration::from_secs(3));
    assert_eq!(config.network_timeout, Duration::from_secs(10));
    assert_eq!(config.charset, Charset::Utf8);
    assert_eq!(
        config.trackers,
        vec![
            TrackerEndpoint::new("192.168.0.10", 22122),
            TrackerEndpoint::new("192.168.0.11", 22123),
        ]
    );
}

#[test]
fn test_defaults_for_missing_values() {
    let config = ClientConfig::from_toml_str(
        r#"
connect_timeout = 0
network_timeout = -1

[[trackers]]
ip = "tracker.local"
port = 22122
"#,
    )
    .unwrap();

    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.network_timeout, Duration::from_secs(30));
    assert_eq!(config.charset, Charset::Latin1);
}

#[test]
fn test_no_trackers_rejected() {
    let result = ClientConfig::from_toml_str("connect_timeout = 5\n");
    assert!(matches!(result, Err(TrackerError::Config(_))));
}

#[test]
fn test_bad_charset_rejected() {
    let result = ClientConfig::from_toml_str(
        r#"
charset = "KOI8-R"

[[trackers]]
ip = "tracker.local"
port = 22122
"#,
    );
    assert!(matches!(result, Err(TrackerError::Config(_))));
}

#[test]
fn test_malformed_toml_rejected() {
    let result = ClientConfig::from_toml_str("[[trackers]\nip = ");
    assert!(matches!(result, Err(TrackerError::Config(_))));
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let result = ClientConfig::from_file(temp.path().join("absent.toml"));
    assert!(matches!(result, Err(TrackerError::Io(_))));
}

// =============================================================================
// Builder
// =============================================================================

#[test]
fn test_builder_keeps_order() {
    let config = ClientConfig::builder()
        .tracker(TrackerEndpoint::new("a", 1))
        .trackers([TrackerEndpoint::new("b", 2), TrackerEndpoint::new("c", 3)])
        .build()
        .unwrap();

    let names: Vec<_> = config.trackers.iter().map(|t| t.address.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_builder_requires_tracker() {
    assert!(ClientConfig::builder().build().is_err());
}

#[test]
fn test_builder_rejects_zero_connect_timeout() {
    let result = ClientConfig::builder()
        .tracker(TrackerEndpoint::new("a", 1))
        .connect_timeout(Duration::ZERO)
        .build();
    assert!(result.is_err());
}

// =============================================================================
// Endpoint Parsing
// =============================================================================

#[test]
fn test_parse_endpoint() {
    let endpoint: TrackerEndpoint = "192.168.0.10:22122".parse().unwrap();
    assert_eq!(endpoint, TrackerEndpoint::new("192.168.0.10", 22122));
    assert_eq!(endpoint.to_string(), "192.168.0.10:22122");

    let v6: TrackerEndpoint = "[::1]:22122".parse().unwrap();
    assert_eq!(v6.address, "::1");
}

#[test]
fn test_parse_endpoint_errors() {
    for input in ["no-port", ":22122", "host:notaport", "host:70000"] {
        assert!(input.parse::<TrackerEndpoint>().is_err(), "{}", input);
    }
}
