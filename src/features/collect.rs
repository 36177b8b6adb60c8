use tracing::{debug, info};

use crate::core::models::{CollectedThread, SlackMessage};
use crate::errors::ExportError;
use crate::slack::MessagingApi;
use crate::utils::filters::{filter_top_level, is_exportable, sort_chronologically};

/// Gather every conversation in a channel, oldest first.
///
/// Thread parents are expanded with their replies; messages outside a thread
/// become a thread of one.
///
/// # Errors
///
/// Returns an error if any Slack call fails.
pub async fn collect_channel<M>(
    api: &M,
    channel_id: &str,
) -> Result<Vec<CollectedThread>, ExportError>
where
    M: MessagingApi + ?Sized,
{
    let mut history = api.history(channel_id).await?;
    sort_chronologically(&mut history);
    let history = filter_top_level(history);
    info!(
        "Fetched {} top-level messages from channel {}",
        history.len(),
        channel_id
    );

    let mut threads = Vec::with_capacity(history.len());
    for parent in history {
        let replies = if parent.is_thread_parent() && parent.reply_count != Some(0) {
            let replies = api.replies(channel_id, &parent.ts).await?;
            thread_replies(&parent.ts, replies)
        } else {
            Vec::new()
        };
        debug!("Thread {} has {} replies", parent.ts, replies.len());
        threads.push(CollectedThread { parent, replies });
    }

    Ok(threads)
}

/// Gather a single thread.
///
/// # Errors
///
/// Returns `NotFoundError` when Slack returns no parent for `thread_ts`, or
/// any error from the Slack call.
pub async fn collect_thread<M>(
    api: &M,
    channel_id: &str,
    thread_ts: &str,
) -> Result<CollectedThread, ExportError>
where
    M: MessagingApi + ?Sized,
{
    let mut messages = api.replies(channel_id, thread_ts).await?;
    sort_chronologically(&mut messages);

    let Some(pos) = messages.iter().position(|m| m.ts == thread_ts) else {
        return Err(ExportError::NotFoundError(format!(
            "thread {thread_ts} in channel {channel_id}"
        )));
    };
    let parent = messages.remove(pos);
    let replies = thread_replies(thread_ts, messages);
    info!(
        "Fetched thread {} with {} replies from channel {}",
        thread_ts,
        replies.len(),
        channel_id
    );

    Ok(CollectedThread { parent, replies })
}

fn thread_replies(parent_ts: &str, replies: Vec<SlackMessage>) -> Vec<SlackMessage> {
    let mut replies: Vec<_> = replies.into_iter().filter(|r| r.ts != parent_ts).collect();
    sort_chronologically(&mut replies);
    // Broadcast replies belong to the thread, so only membership noise is dropped here.
    replies.retain(is_exportable);
    replies
}
