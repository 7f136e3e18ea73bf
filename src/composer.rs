use crate::twitter_message::{Message, Reply, MAX_REPLY_CHARS};

/// Everyone in the conversation except us: mentions in order, then the author.
/// Handles compare case-sensitively, the way the service reports them.
pub fn participants<'m>(message: &'m Message, self_handle: &str) -> Vec<&'m str> {
    let mut handles: Vec<&str> = Vec::with_capacity(message.mentions.len() + 1);
    for handle in message
        .mentions
        .iter()
        .chain(std::iter::once(&message.author))
    {
        if handle != self_handle && !handles.contains(&handle.as_str()) {
            handles.push(handle.as_str());
        }
    }
    handles
}

/// Build `@a @b <line>` in reply to `message`, cut to the status length limit.
/// The caller has already dropped messages we authored.
pub fn build_reply(message: &Message, self_handle: &str, chosen_line: &str) -> Reply {
    let prefix = participants(message, self_handle)
        .iter()
        .map(|h| format!("@{}", h))
        .collect::<Vec<_>>()
        .join(" ");
    let text = format!("{} {}", prefix, chosen_line);

    let (text, truncated) = if text.chars().count() > MAX_REPLY_CHARS {
        tracing::warn!("ALMOST SENT TOO LONG REPLY \"{}\"", text);
        (text.chars().take(MAX_REPLY_CHARS).collect(), true)
    } else {
        (text, false)
    };

    Reply {
        text,
        in_reply_to: Some(message.id.clone()),
        truncated,
    }
}
