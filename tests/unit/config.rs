//! Unit tests for environment configuration

use std::collections::HashMap;
use std::time::Duration;

use bandwatch::config::AppConfig;
use bandwatch::error::ConfigError;
use bandwatch::models::timeframe::Timeframe;

fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

const CREDENTIALS: [(&str, &str); 2] = [("TELEGRAM_TOKEN", "123:abc"), ("CHAT_ID", "-100200")];

fn with_credentials(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut vars = CREDENTIALS.to_vec();
    vars.extend_from_slice(extra);
    vars
}

#[test]
fn test_missing_credentials() {
    assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("TELEGRAM_TOKEN"));
    assert_eq!(
        load(&[("TELEGRAM_TOKEN", "123:abc")]).unwrap_err(),
        ConfigError::Missing("CHAT_ID")
    );
    assert_eq!(
        load(&[("TELEGRAM_TOKEN", "   "), ("CHAT_ID", "1")]).unwrap_err(),
        ConfigError::Missing("TELEGRAM_TOKEN")
    );
}

#[test]
fn test_defaults() {
    let config = load(&CREDENTIALS).unwrap();

    assert_eq!(config.telegram.token, "123:abc");
    assert_eq!(config.telegram.chat_id, "-100200");
    assert_eq!(config.telegram.api_url.as_str(), "https://api.telegram.org/");
    assert_eq!(config.port, 10000);
    assert_eq!(config.eval_interval, Duration::from_secs(60));
    assert_eq!(config.timeframe, Timeframe::OneHour);
    assert_eq!(config.bar_limit, 120);
    assert_eq!(config.scan_concurrency, 1);
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert_eq!(config.bitget_base_url.host_str(), Some("api.bitget.com"));
}

#[test]
fn test_overrides() {
    let config = load(&with_credentials(&[
        ("PORT", "8080"),
        ("EVAL_INTERVAL_SECONDS", "300"),
        ("TIMEFRAME", "4H"),
        ("BAR_LIMIT", "200"),
        ("SCAN_CONCURRENCY", "8"),
        ("HTTP_TIMEOUT_SECONDS", "5"),
        ("BITGET_BASE_URL", "http://127.0.0.1:9000"),
    ]))
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.eval_interval, Duration::from_secs(300));
    assert_eq!(config.timeframe, Timeframe::FourHours);
    assert_eq!(config.bar_limit, 200);
    assert_eq!(config.scan_concurrency, 8);
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.bitget_base_url.port(), Some(9000));
}

#[test]
fn test_invalid_values() {
    let cases = [
        ("EVAL_INTERVAL_SECONDS", "0"),
        ("EVAL_INTERVAL_SECONDS", "soon"),
        ("BAR_LIMIT", "20"),
        ("BAR_LIMIT", "1000"),
        ("SCAN_CONCURRENCY", "0"),
        ("HTTP_TIMEOUT_SECONDS", "0"),
        ("PORT", "70000"),
        ("TIMEFRAME", "2h"),
        ("BITGET_BASE_URL", "not a url"),
    ];

    for (key, value) in cases {
        match load(&with_credentials(&[(key, value)])) {
            Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
            other => panic!("{}={} should be invalid, got {:?}", key, value, other),
        }
    }
}

#[test]
fn test_bar_limit_bounds_are_inclusive() {
    assert!(load(&with_credentials(&[("BAR_LIMIT", "21")])).is_ok());
    assert!(load(&with_credentials(&[("BAR_LIMIT", "999")])).is_ok());
}
