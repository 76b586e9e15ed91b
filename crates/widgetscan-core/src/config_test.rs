use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.output_dir, PathBuf::from("./output"));
    assert!(cfg.vendors_path.is_none());
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.max_redirects, 10);
    assert_eq!(cfg.inter_request_delay_ms, 1000);
    assert_eq!(cfg.max_concurrent_fetches, 1);
    assert_eq!(cfg.max_retries, 1);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
}

#[test]
fn build_app_config_overrides() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_OUTPUT_DIR", "/tmp/leads");
    map.insert("WIDGETSCAN_VENDORS_PATH", "./config/vendors.yaml");
    map.insert("WIDGETSCAN_USER_AGENT", "widgetscan-test/1.0");
    map.insert("WIDGETSCAN_INTER_REQUEST_DELAY_MS", "0");
    map.insert("WIDGETSCAN_MAX_CONCURRENT_FETCHES", "4");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/leads"));
    assert_eq!(
        cfg.vendors_path,
        Some(PathBuf::from("./config/vendors.yaml"))
    );
    assert_eq!(cfg.user_agent, "widgetscan-test/1.0");
    assert_eq!(cfg.inter_request_delay_ms, 0);
    assert_eq!(cfg.max_concurrent_fetches, 4);
}

#[test]
fn blank_vendors_path_is_ignored() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_VENDORS_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.vendors_path.is_none());
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIDGETSCAN_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(WIDGETSCAN_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_retries_invalid() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIDGETSCAN_MAX_RETRIES"),
        "expected InvalidEnvVar(WIDGETSCAN_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn zero_concurrency_rejected() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_MAX_CONCURRENT_FETCHES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIDGETSCAN_MAX_CONCURRENT_FETCHES"),
        "expected InvalidEnvVar(WIDGETSCAN_MAX_CONCURRENT_FETCHES), got: {result:?}"
    );
}

#[test]
fn invalid_value_message_names_the_variable() {
    let mut map = HashMap::new();
    map.insert("WIDGETSCAN_MAX_CONCURRENT_FETCHES", "viele");
    let err = build_app_config(lookup_from_map(&map)).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.starts_with("invalid value for WIDGETSCAN_MAX_CONCURRENT_FETCHES: "),
        "unexpected message: {msg}"
    );
}
