//! All Slack-specific functionality

pub mod client;

use async_trait::async_trait;

use crate::core::models::{AuthIdentity, ChannelInfo, SlackMessage, UserDirectory};
use crate::errors::ExportError;

pub use client::SlackClient;

/// Read side of the messaging API used by an export.
#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Verify the token and report who it acts as (`auth.test`).
    async fn authenticate(&self) -> Result<AuthIdentity, ExportError>;

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ExportError>;

    async fn users(&self) -> Result<UserDirectory, ExportError>;

    /// Full channel history, newest first as Slack returns it.
    async fn history(&self, channel_id: &str) -> Result<Vec<SlackMessage>, ExportError>;

    /// A thread's messages, parent first.
    async fn replies(&self, channel_id: &str, thread_ts: &str)
    -> Result<Vec<SlackMessage>, ExportError>;
}
