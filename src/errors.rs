use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),

    #[error("Slack authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Not found or not accessible: {0}")]
    NotFoundError(String),

    #[error("Transport failure: {0}")]
    TransportError(String),

    #[error("Failed to serialize export: {0}")]
    SerializationError(String),
}

impl ExportError {
    /// Classify a Slack Web API `error` code returned with `ok: false`.
    #[must_use]
    pub fn from_slack_code(method: &str, code: &str) -> Self {
        let msg = format!("{method} error: {code}");
        match code {
            "invalid_auth" | "not_authed" | "token_revoked" | "token_expired"
            | "account_inactive" | "missing_scope" | "not_allowed_token_type" => {
                ExportError::AuthenticationError(msg)
            }
            "channel_not_found" | "not_in_channel" | "thread_not_found" | "access_denied" => {
                ExportError::NotFoundError(msg)
            }
            _ => ExportError::TransportError(msg),
        }
    }
}

impl From<reqwest::Error> for ExportError {
    fn from(error: reqwest::Error) -> Self {
        ExportError::TransportError(error.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(error: serde_json::Error) -> Self {
        ExportError::SerializationError(error.to_string())
    }
}

/// The step of an export run that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Auth,
    Fetch,
    Serialize,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Auth => "auth",
            Stage::Fetch => "fetch",
            Stage::Serialize => "serialize",
            Stage::Upload => "upload",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: ExportError,
}

impl StageError {
    #[must_use]
    pub fn new(stage: Stage, source: ExportError) -> Self {
        Self { stage, source }
    }
}
