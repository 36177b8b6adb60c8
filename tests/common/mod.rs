#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use slack_export::core::models::{AuthIdentity, ChannelInfo, SlackMessage, UserDirectory};
use slack_export::errors::ExportError;
use slack_export::slack::MessagingApi;
use slack_export::storage::ObjectStore;

pub fn msg(ts: &str, user: &str, text: &str) -> SlackMessage {
    SlackMessage {
        ts: ts.to_string(),
        user: Some(user.to_string()),
        text: Some(text.to_string()),
        ..SlackMessage::default()
    }
}

pub fn parent(ts: &str, user: &str, text: &str, replies: u32) -> SlackMessage {
    SlackMessage {
        thread_ts: Some(ts.to_string()),
        reply_count: Some(replies),
        ..msg(ts, user, text)
    }
}

pub fn reply(ts: &str, thread_ts: &str, user: &str, text: &str) -> SlackMessage {
    SlackMessage {
        thread_ts: Some(thread_ts.to_string()),
        ..msg(ts, user, text)
    }
}

/// In-memory Slack workspace.
#[derive(Default)]
pub struct FakeSlack {
    pub bot_id: Option<String>,
    pub reject_token: bool,
    pub users_fail: bool,
    pub channels: Mutex<HashMap<String, ChannelInfo>>,
    pub history: HashMap<String, Vec<SlackMessage>>,
    pub threads: HashMap<(String, String), Vec<SlackMessage>>,
    pub users: UserDirectory,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSlack {
    pub fn with_channel(id: &str, name: &str) -> Self {
        let mut fake = Self::default();
        fake.channels.lock().unwrap().insert(
            id.to_string(),
            ChannelInfo {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
        fake.history.insert(id.to_string(), Vec::new());
        fake
    }

    /// Store history newest first, the way Slack returns it.
    pub fn set_history(&mut self, channel: &str, mut messages: Vec<SlackMessage>) {
        messages.reverse();
        self.history.insert(channel.to_string(), messages);
    }

    pub fn set_thread(&mut self, channel: &str, thread_ts: &str, messages: Vec<SlackMessage>) {
        self.threads
            .insert((channel.to_string(), thread_ts.to_string()), messages);
    }

    /// Rename a channel in place, as a workspace admin would between runs.
    pub fn rename_channel(&self, id: &str, name: &str) {
        if let Some(channel) = self.channels.lock().unwrap().get_mut(id) {
            channel.name = name.to_string();
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MessagingApi for FakeSlack {
    async fn authenticate(&self) -> Result<AuthIdentity, ExportError> {
        self.record("auth.test".to_string());
        if self.reject_token {
            return Err(ExportError::from_slack_code("auth.test", "invalid_auth"));
        }
        Ok(AuthIdentity {
            user_id: "UME".to_string(),
            team: Some("acme".to_string()),
            bot_id: self.bot_id.clone(),
        })
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ExportError> {
        self.record(format!("conversations.info {channel_id}"));
        self.channels
            .lock()
            .unwrap()
            .get(channel_id)
            .cloned()
            .ok_or_else(|| ExportError::from_slack_code("conversations.info", "channel_not_found"))
    }

    async fn users(&self) -> Result<UserDirectory, ExportError> {
        self.record("users.list".to_string());
        if self.users_fail {
            return Err(ExportError::from_slack_code("users.list", "missing_scope"));
        }
        Ok(self.users.clone())
    }

    async fn history(&self, channel_id: &str) -> Result<Vec<SlackMessage>, ExportError> {
        self.record(format!("conversations.history {channel_id}"));
        self.history.get(channel_id).cloned().ok_or_else(|| {
            ExportError::from_slack_code("conversations.history", "channel_not_found")
        })
    }

    async fn replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Vec<SlackMessage>, ExportError> {
        self.record(format!("conversations.replies {channel_id} {thread_ts}"));
        self.threads
            .get(&(channel_id.to_string(), thread_ts.to_string()))
            .cloned()
            .ok_or_else(|| {
                ExportError::from_slack_code("conversations.replies", "thread_not_found")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Bucket kept in memory; `unreachable` makes every write fail.
#[derive(Default)]
pub struct MemoryStore {
    pub unreachable: bool,
    pub objects: Mutex<HashMap<String, StoredObject>>,
    pub put_calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn put_calls(&self) -> Vec<String> {
        self.put_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        "test-bucket"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ExportError> {
        self.put_calls.lock().unwrap().push(key.to_string());
        if self.unreachable {
            return Err(ExportError::TransportError(format!(
                "s3 put_object s3://test-bucket/{key}: dispatch failure"
            )));
        }
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
