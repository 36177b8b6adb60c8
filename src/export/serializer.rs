//! Turns collected threads into the JSON document stored in the bucket.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::core::models::{
    ChannelInfo, CollectedThread, ExportArtifact, ExportMessage, ExportTopic, SlackMessage,
    UserDirectory,
};
use crate::errors::ExportError;
use crate::utils::filters::ts_sort_key;
use crate::utils::text::normalize_text;

pub const CONTENT_TYPE: &str = "application/json";

const UNKNOWN_USER: &str = "unknown";
const CHANNEL_OBJECT: &str = "channel.json";

#[must_use]
pub fn build_artifact(
    channel: &ChannelInfo,
    thread_ts: Option<&str>,
    threads: &[CollectedThread],
    users: &UserDirectory,
    tz: Tz,
) -> ExportArtifact {
    let topics: Vec<ExportTopic> = threads
        .iter()
        .map(|thread| build_topic(thread, users, tz))
        .collect();
    let message_count = topics.iter().map(|t| t.messages.len()).sum();

    ExportArtifact {
        channel_id: channel.id.clone(),
        channel_name: channel.name.clone(),
        thread_ts: thread_ts.map(str::to_string),
        message_count,
        topics,
    }
}

fn build_topic(thread: &CollectedThread, users: &UserDirectory, tz: Tz) -> ExportTopic {
    let messages: Vec<ExportMessage> = thread
        .messages()
        .map(|msg| build_message(msg, users, tz))
        .collect();

    ExportTopic {
        topic: messages.first().map(|m| m.text.clone()).unwrap_or_default(),
        thread_ts: thread.parent.is_thread_parent().then(|| thread.parent.ts.clone()),
        messages,
    }
}

fn build_message(msg: &SlackMessage, users: &UserDirectory, tz: Tz) -> ExportMessage {
    let user = msg
        .user
        .as_deref()
        .map(|id| users.name(id).unwrap_or(id))
        .or(msg.bot_id.as_deref())
        .unwrap_or(UNKNOWN_USER)
        .to_string();

    ExportMessage {
        user,
        user_id: msg.user.clone(),
        text: normalize_text(msg.text.as_deref().unwrap_or(""), users),
        ts: msg.ts.clone(),
        datetime: ts_to_datetime(&msg.ts, tz),
    }
}

/// Render a Slack `ts` as an RFC 3339 timestamp in `tz`.
#[must_use]
pub fn ts_to_datetime(ts: &str, tz: Tz) -> String {
    let (secs, micros) = ts_sort_key(ts);
    let secs = i64::try_from(secs).unwrap_or(0);
    let nanos = u32::try_from(micros.saturating_mul(1_000)).unwrap_or(0);
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .unwrap_or_default()
        .with_timezone(&tz)
        .to_rfc3339()
}

/// Object key for an export. The same inputs always yield the same key, so a
/// re-run overwrites the previous artifact. The channel name is left out: a
/// renamed channel keeps its key.
#[must_use]
pub fn artifact_key(prefix: &str, channel_id: &str, thread_ts: Option<&str>) -> String {
    let object = match thread_ts {
        Some(ts) => format!("thread-{ts}.json"),
        None => CHANNEL_OBJECT.to_string(),
    };
    let path = format!("{}/{object}", sanitize_segment(channel_id));
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        path
    } else {
        format!("{prefix}/{path}")
    }
}

fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Encode the artifact as pretty-printed UTF-8 JSON.
///
/// # Errors
///
/// Returns `SerializationError` if encoding fails.
pub fn encode(artifact: &ExportArtifact) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(artifact)?)
}
