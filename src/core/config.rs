use std::env;
use std::fmt;
use std::time::Duration;

use chrono_tz::Tz;

use crate::errors::ExportError;

pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
pub const SLACK_API_USER_TOKEN: &str = "SLACK_API_USER_TOKEN";
pub const SLACK_CHANNEL_ID: &str = "SLACK_CHANNEL_ID";
pub const SLACK_THREAD_TS: &str = "SLACK_THREAD_TS";
pub const SLACK_API_BASE_URL: &str = "SLACK_API_BASE_URL";
pub const S3_NAME: &str = "S3_NAME";
pub const S3_KEY_PREFIX: &str = "S3_KEY_PREFIX";
pub const EXPORT_HTTP_TIMEOUT_SECS: &str = "EXPORT_HTTP_TIMEOUT_SECS";
pub const EXPORT_TIMEZONE: &str = "EXPORT_TIMEZONE";

pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_KEY_PREFIX: &str = "slack_history";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const USER_TOKEN_PREFIX: &str = "xoxp-";
const BOT_TOKEN_PREFIX: &str = "xoxb-";

#[derive(Clone)]
pub struct AppConfig {
    pub aws_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_session_token: Option<String>,
    pub slack_user_token: String,
    pub slack_channel_id: String,
    pub slack_thread_ts: Option<String>,
    pub slack_api_base_url: String,
    pub s3_bucket: String,
    pub s3_key_prefix: String,
    pub http_timeout: Duration,
    pub timezone: Tz,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for missing or malformed variables and
    /// `AuthenticationError` when the Slack token is not user-scoped.
    pub fn from_env() -> Result<Self, ExportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key)
                .ok_or_else(|| ExportError::ConfigurationError(format!("{key} is not set")))
        };

        let aws_region = required(AWS_DEFAULT_REGION)?;
        let aws_access_key_id = required(AWS_ACCESS_KEY_ID)?;
        let aws_secret_access_key = required(AWS_SECRET_ACCESS_KEY)?;
        let slack_user_token = required(SLACK_API_USER_TOKEN)?;
        let slack_channel_id = required(SLACK_CHANNEL_ID)?;
        let s3_bucket = required(S3_NAME)?;

        let slack_thread_ts = optional(SLACK_THREAD_TS);
        if let Some(ts) = slack_thread_ts.as_deref()
            && !is_slack_ts(ts)
        {
            return Err(ExportError::ConfigurationError(format!(
                "{SLACK_THREAD_TS} is not a message timestamp: {ts}"
            )));
        }

        let http_timeout = match optional(EXPORT_HTTP_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ExportError::ConfigurationError(format!(
                        "{EXPORT_HTTP_TIMEOUT_SECS} must be a positive number of seconds: {raw}"
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let timezone = match optional(EXPORT_TIMEZONE) {
            Some(name) => name.trim().parse::<Tz>().map_err(|e| {
                ExportError::ConfigurationError(format!("{EXPORT_TIMEZONE}: {e}"))
            })?,
            None => Tz::UTC,
        };

        check_user_token(&slack_user_token)?;

        Ok(Self {
            aws_region,
            aws_access_key_id,
            aws_secret_access_key,
            aws_session_token: optional(AWS_SESSION_TOKEN),
            slack_user_token,
            slack_channel_id,
            slack_thread_ts,
            slack_api_base_url: optional(SLACK_API_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string()),
            s3_bucket,
            s3_key_prefix: optional(S3_KEY_PREFIX)
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
            http_timeout,
            timezone,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("aws_region", &self.aws_region)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field(
                "aws_session_token",
                &self.aws_session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("slack_user_token", &"<redacted>")
            .field("slack_channel_id", &self.slack_channel_id)
            .field("slack_thread_ts", &self.slack_thread_ts)
            .field("slack_api_base_url", &self.slack_api_base_url)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_key_prefix", &self.s3_key_prefix)
            .field("http_timeout", &self.http_timeout)
            .field("timezone", &self.timezone)
            .finish()
    }
}

/// Reject tokens that cannot act on behalf of a human user.
///
/// # Errors
///
/// Returns `AuthenticationError` for bot tokens and any other non-user token.
pub fn check_user_token(token: &str) -> Result<(), ExportError> {
    if token.starts_with(BOT_TOKEN_PREFIX) {
        return Err(ExportError::AuthenticationError(format!(
            "{SLACK_API_USER_TOKEN} is a bot token; a user token ({USER_TOKEN_PREFIX}...) is required"
        )));
    }
    if !token.starts_with(USER_TOKEN_PREFIX) {
        return Err(ExportError::AuthenticationError(format!(
            "{SLACK_API_USER_TOKEN} is not a user token ({USER_TOKEN_PREFIX}...)"
        )));
    }
    Ok(())
}

/// Slack message timestamps are "seconds.micros" with exactly six fraction digits.
fn is_slack_ts(ts: &str) -> bool {
    match ts.split_once('.') {
        Some((secs, frac)) => {
            !secs.is_empty()
                && frac.len() == 6
                && secs.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
