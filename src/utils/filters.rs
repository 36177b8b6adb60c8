use crate::core::models::SlackMessage;

const MEMBERSHIP_SUBTYPES: [&str; 2] = ["channel_join", "channel_leave"];
const THREAD_BROADCAST_SUBTYPE: &str = "thread_broadcast";
const TS_FRACTION_DIGITS: usize = 6;

/// Whether a message carries conversation content; join/leave notices don't.
#[must_use]
pub fn is_exportable(msg: &SlackMessage) -> bool {
    !msg
        .subtype
        .as_deref()
        .is_some_and(|subtype| MEMBERSHIP_SUBTYPES.contains(&subtype))
}

/// Whether a channel history entry starts a conversation of its own.
///
/// Replies echoed into the channel (`thread_broadcast`) are exported inside
/// their thread, so their channel copy is skipped.
#[must_use]
pub fn is_top_level(msg: &SlackMessage) -> bool {
    let is_broadcast = msg.reply_broadcast
        || msg.subtype.as_deref() == Some(THREAD_BROADCAST_SUBTYPE);
    let is_reply = msg
        .thread_ts
        .as_deref()
        .is_some_and(|thread_ts| thread_ts != msg.ts);

    !is_broadcast && !is_reply
}

/// Filters channel history down to the messages that open a topic.
#[must_use]
pub fn filter_top_level(messages: Vec<SlackMessage>) -> Vec<SlackMessage> {
    messages
        .into_iter()
        .filter(|m| is_top_level(m) && is_exportable(m))
        .collect()
}

/// Sort key for a Slack `ts` ("seconds.micros"); malformed values sort first.
///
/// The fraction is read as microseconds, so "5.5" is half a second.
#[must_use]
pub fn ts_sort_key(ts: &str) -> (u64, u64) {
    let (secs, frac) = ts.split_once('.').unwrap_or((ts, ""));
    let micros: String = frac
        .chars()
        .chain(std::iter::repeat('0'))
        .take(TS_FRACTION_DIGITS)
        .collect();
    (secs.parse().unwrap_or(0), micros.parse().unwrap_or(0))
}

/// Order messages oldest first; ties keep their input order.
pub fn sort_chronologically(messages: &mut [SlackMessage]) {
    messages.sort_by_key(|m| ts_sort_key(&m.ts));
}
