use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A message as returned by `conversations.history` / `conversations.replies`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SlackMessage {
    pub ts: String,
    pub user: Option<String>,
    pub text: Option<String>,
    pub thread_ts: Option<String>,
    pub reply_count: Option<u32>,
    #[serde(default)]
    pub reply_broadcast: bool,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
}

impl SlackMessage {
    /// True when this message starts a thread.
    #[must_use]
    pub fn is_thread_parent(&self) -> bool {
        self.thread_ts.as_deref() == Some(self.ts.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
}

/// Identity behind the token, from `auth.test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: String,
    pub team: Option<String>,
    pub bot_id: Option<String>,
}

impl AuthIdentity {
    #[must_use]
    pub fn is_bot(&self) -> bool {
        self.bot_id.is_some()
    }
}

/// User id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(user_id.into(), name.into());
    }

    #[must_use]
    pub fn name(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// A thread parent with its replies, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedThread {
    pub parent: SlackMessage,
    pub replies: Vec<SlackMessage>,
}

impl CollectedThread {
    #[must_use]
    pub fn message_count(&self) -> usize {
        1 + self.replies.len()
    }

    pub fn messages(&self) -> impl Iterator<Item = &SlackMessage> {
        std::iter::once(&self.parent).chain(self.replies.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMessage {
    pub user: String,
    pub user_id: Option<String>,
    pub text: String,
    pub ts: String,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTopic {
    pub topic: String,
    pub thread_ts: Option<String>,
    pub messages: Vec<ExportMessage>,
}

/// The document written to the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportArtifact {
    pub channel_id: String,
    pub channel_name: String,
    pub thread_ts: Option<String>,
    pub message_count: usize,
    pub topics: Vec<ExportTopic>,
}
