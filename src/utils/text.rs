use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::models::UserDirectory;

// Slack message markup:
// - user mentions: <@U123> or <@U123|name>
// - channel mentions: <#C123|general> or <#C123>
// - links: <https://example.com> or <https://example.com|label>
// Source: https://docs.slack.dev/messaging/formatting-message-text/
static USER_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<@([UW][A-Z0-9]+)(?:\|[^>]*)?>")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

static CHANNEL_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<#([CG][A-Z0-9]+)(?:\|([^>]*))?>")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(https?://[^>|\s]+)(?:\|([^>]+))?>")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// Expand Slack markup into readable text.
///
/// Mentions of users missing from `users` are left untouched.
#[must_use]
pub fn normalize_text(text: &str, users: &UserDirectory) -> String {
    let text = USER_MENTION_RE.replace_all(text, |caps: &Captures<'_>| match users.name(&caps[1]) {
        Some(name) => Cow::Owned(format!("@{name}")),
        None => Cow::Owned(caps[0].to_string()),
    });

    let text = CHANNEL_MENTION_RE.replace_all(&text, |caps: &Captures<'_>| {
        match caps.get(2).map(|m| m.as_str()).filter(|n| !n.is_empty()) {
            Some(name) => format!("#{name}"),
            None => format!("#{}", &caps[1]),
        }
    });

    let text = LINK_RE.replace_all(&text, |caps: &Captures<'_>| match caps.get(2) {
        Some(label) => format!("{} ({})", label.as_str(), &caps[1]),
        None => caps[1].to_string(),
    });

    unescape_entities(&text)
}

/// Slack escapes exactly these three characters in message text.
#[must_use]
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
