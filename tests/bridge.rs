#![cfg(feature = "tracing-bridge")]

use ezlog::init::init_tracing;
use ezlog::options::*;
use ezlog::{fields, Log, LogError};
use serde_json::Value;

#[test]
fn tracing_events_land_in_the_rolling_file() {
    let tmp = tempfile::tempdir().unwrap();
    let log = Log::new([
        with_output_file_path(tmp.path(), "bridge"),
        with_global_prefix(fields! { "service" => "x" }),
    ])
    .unwrap();

    init_tracing(&log).unwrap();
    let err = init_tracing(&log).unwrap_err();
    assert!(matches!(err, LogError::SubscriberInit(_)));

    tracing::debug!("below the info threshold");
    tracing::error!(user_id = 42, "authentication failed");
    log.info().msg("direct");

    let content = std::fs::read_to_string(tmp.path().join("bridge.log")).unwrap();
    let records: Vec<Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["level"], "error");
    assert_eq!(records[0]["service"], "x");
    assert_eq!(records[0]["user_id"], 42);
    assert_eq!(records[0]["message"], "authentication failed");
    assert_eq!(records[1]["message"], "direct");
}
