use std::collections::HashMap;
use std::time::Duration;

use chrono_tz::Tz;
use slack_export::core::config::AppConfig;
use slack_export::errors::ExportError;

fn base_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("AWS_DEFAULT_REGION", "ap-northeast-1".to_string()),
        ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE".to_string()),
        ("AWS_SECRET_ACCESS_KEY", "secret-key".to_string()),
        ("SLACK_API_USER_TOKEN", "xoxp-1234-5678".to_string()),
        ("SLACK_CHANNEL_ID", "C0123456".to_string()),
        ("S3_NAME", "slack-archive".to_string()),
    ])
}

fn load(env: &HashMap<&'static str, String>) -> Result<AppConfig, ExportError> {
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_loads_required_values_with_defaults() {
    let config = load(&base_env()).unwrap();

    assert_eq!(config.aws_region, "ap-northeast-1");
    assert_eq!(config.slack_channel_id, "C0123456");
    assert_eq!(config.s3_bucket, "slack-archive");
    assert_eq!(config.slack_thread_ts, None);
    assert_eq!(config.aws_session_token, None);
    assert_eq!(config.slack_api_base_url, "https://slack.com/api");
    assert_eq!(config.s3_key_prefix, "slack_history");
    assert_eq!(config.http_timeout, Duration::from_secs(30));
    assert_eq!(config.timezone, Tz::UTC);
}

#[test]
fn test_each_required_variable_is_checked() {
    for key in [
        "AWS_DEFAULT_REGION",
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "SLACK_API_USER_TOKEN",
        "SLACK_CHANNEL_ID",
        "S3_NAME",
    ] {
        let mut env = base_env();
        env.remove(key);
        match load(&env) {
            Err(ExportError::ConfigurationError(msg)) => assert!(msg.contains(key), "{msg}"),
            other => panic!("Expected ConfigurationError for {key}, got: {other:?}"),
        }
    }
}

#[test]
fn test_blank_value_counts_as_missing() {
    let mut env = base_env();
    env.insert("S3_NAME", "   ".to_string());

    assert!(matches!(load(&env), Err(ExportError::ConfigurationError(_))));
}

#[test]
fn test_bot_token_is_rejected() {
    let mut env = base_env();
    env.insert("SLACK_API_USER_TOKEN", "xoxb-1234-5678".to_string());

    match load(&env) {
        Err(ExportError::AuthenticationError(msg)) => assert!(msg.contains("bot token")),
        other => panic!("Expected AuthenticationError, got: {other:?}"),
    }
}

#[test]
fn test_optional_values_are_parsed() {
    let mut env = base_env();
    env.insert("AWS_SESSION_TOKEN", "session".to_string());
    env.insert("SLACK_THREAD_TS", "1700000000.000100".to_string());
    env.insert("SLACK_API_BASE_URL", "http://localhost:9000/api/".to_string());
    env.insert("S3_KEY_PREFIX", "/archive/slack/".to_string());
    env.insert("EXPORT_HTTP_TIMEOUT_SECS", "5".to_string());
    env.insert("EXPORT_TIMEZONE", "Asia/Tokyo".to_string());

    let config = load(&env).unwrap();

    assert_eq!(config.aws_session_token.as_deref(), Some("session"));
    assert_eq!(config.slack_thread_ts.as_deref(), Some("1700000000.000100"));
    assert_eq!(config.slack_api_base_url, "http://localhost:9000/api");
    assert_eq!(config.s3_key_prefix, "archive/slack");
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.timezone, chrono_tz::Asia::Tokyo);
}

#[test]
fn test_malformed_optional_values_are_rejected() {
    for (key, value) in [
        ("SLACK_THREAD_TS", "yesterday"),
        ("EXPORT_HTTP_TIMEOUT_SECS", "0"),
        ("EXPORT_HTTP_TIMEOUT_SECS", "soon"),
        ("EXPORT_TIMEZONE", "Mars/Olympus"),
    ] {
        let mut env = base_env();
        env.insert(key, value.to_string());
        assert!(
            matches!(load(&env), Err(ExportError::ConfigurationError(_))),
            "{key}={value} should be rejected"
        );
    }
}

#[test]
fn test_debug_output_redacts_secrets() {
    let mut env = base_env();
    env.insert("AWS_SESSION_TOKEN", "session-secret".to_string());
    let config = load(&env).unwrap();

    let debug = format!("{config:?}");

    assert!(!debug.contains("secret-key"));
    assert!(!debug.contains("xoxp-1234-5678"));
    assert!(!debug.contains("session-secret"));
    assert!(debug.contains("C0123456"));
}
