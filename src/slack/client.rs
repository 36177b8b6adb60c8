//! Slack Web API client module
//!
//! Read-only access to the endpoints an export needs. Every call is a `GET`
//! with bearer auth; Slack's `ok: false` bodies are mapped onto [`ExportError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::MessagingApi;
use crate::core::models::{AuthIdentity, ChannelInfo, SlackMessage, UserDirectory};
use crate::errors::ExportError;

/// Page size for cursor-paginated methods.
pub const PAGE_LIMIT: &str = "200";

const UNKNOWN_CHANNEL: &str = "unknown_channel";

#[derive(Debug, Deserialize)]
struct SlackUserProfile {
    display_name: Option<String>,
    real_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    id: String,
    #[serde(default)]
    name: String,
    profile: Option<SlackUserProfile>,
}

impl SlackUser {
    fn display_name(&self) -> String {
        let non_empty = |s: &Option<String>| {
            s.as_deref()
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        self.profile
            .as_ref()
            .and_then(|p| non_empty(&p.display_name).or_else(|| non_empty(&p.real_name)))
            .or_else(|| (!self.name.is_empty()).then(|| self.name.clone()))
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Slack API client bound to one token
pub struct SlackClient {
    http: Client,
    token: String,
    base_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn with_base_url(token: String, base_url: &str, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, ExportError> {
        debug!("Calling Slack {}", method);
        let resp = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await
            .map_err(|e| ExportError::TransportError(format!("{method} HTTP: {e}")))?;

        if !resp.status().is_success() {
            return Err(ExportError::TransportError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            ExportError::TransportError(format!("{method} JSON parse error: {e}"))
        })?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            return Err(ExportError::from_slack_code(method, code));
        }

        Ok(body)
    }

    /// Call a cursor-paginated method and gather `field` from every page.
    async fn call_paginated<T>(
        &self,
        method: &str,
        params: &[(&str, &str)],
        field: &str,
    ) -> Result<Vec<T>, ExportError>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut page_params = params.to_vec();
            if let Some(c) = cursor.as_deref() {
                page_params.push(("cursor", c));
            }

            let mut body = self.call(method, &page_params).await?;
            let page: Vec<T> = match body.get_mut(field).map(Value::take) {
                Some(raw) => serde_json::from_value(raw).map_err(|e| {
                    ExportError::TransportError(format!("{method} unexpected {field}: {e}"))
                })?,
                None => Vec::new(),
            };
            items.extend(page);

            let next = body
                .pointer("/response_metadata/next_cursor")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
                .map(str::to_string);

            match next {
                Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl MessagingApi for SlackClient {
    async fn authenticate(&self) -> Result<AuthIdentity, ExportError> {
        let body = self.call("auth.test", &[]).await?;
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(AuthIdentity {
            user_id: field("user_id").unwrap_or_default(),
            team: field("team"),
            bot_id: field("bot_id"),
        })
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ExportError> {
        let body = self
            .call("conversations.info", &[("channel", channel_id)])
            .await?;
        let channel = body.get("channel");

        Ok(ChannelInfo {
            id: channel
                .and_then(|c| c.get("id"))
                .and_then(Value::as_str)
                .unwrap_or(channel_id)
                .to_string(),
            name: channel
                .and_then(|c| c.get("name"))
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_CHANNEL)
                .to_string(),
        })
    }

    async fn users(&self) -> Result<UserDirectory, ExportError> {
        let users: Vec<SlackUser> = self
            .call_paginated("users.list", &[("limit", PAGE_LIMIT)], "members")
            .await?;

        Ok(users
            .iter()
            .map(|u| (u.id.clone(), u.display_name()))
            .collect())
    }

    async fn history(&self, channel_id: &str) -> Result<Vec<SlackMessage>, ExportError> {
        self.call_paginated(
            "conversations.history",
            &[("channel", channel_id), ("limit", PAGE_LIMIT)],
            "messages",
        )
        .await
    }

    async fn replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<SlackMessage>, ExportError> {
        self.call_paginated(
            "conversations.replies",
            &[("channel", channel_id), ("ts", thread_ts), ("limit", PAGE_LIMIT)],
            "messages",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(json: Value) -> SlackUser {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_display_name_prefers_profile_display_name() {
        let u = user(serde_json::json!({
            "id": "U1",
            "name": "alice.smith",
            "profile": { "display_name": "alice", "real_name": "Alice Smith" }
        }));
        assert_eq!(u.display_name(), "alice");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let real = user(serde_json::json!({
            "id": "U1",
            "name": "bob",
            "profile": { "display_name": "", "real_name": "Bob Jones" }
        }));
        assert_eq!(real.display_name(), "Bob Jones");

        let handle = user(serde_json::json!({ "id": "U2", "name": "carol" }));
        assert_eq!(handle.display_name(), "carol");

        let bare = user(serde_json::json!({ "id": "U3" }));
        assert_eq!(bare.display_name(), "U3");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SlackClient::with_base_url(
            "xoxp-test".to_string(),
            "http://localhost:1234/api/",
            Duration::from_secs(1),
        );
        assert_eq!(client.base_url(), "http://localhost:1234/api");
    }
}
