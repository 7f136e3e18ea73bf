use serde_json::Value;

/// Largest status the service accepts, in characters.
pub const MAX_REPLY_CHARS: usize = 140;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Account activity: follow, favorite, user_update and friends.
    System(SystemEvent),
    Message(Message),
    /// The remote side hung up the stream.
    ConnectionDrop,
    /// Any record shape we don't understand (friends preamble, delete notices, ...).
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemEvent {
    pub kind: String,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub author: String,
    pub text: String,
    pub mentions: Vec<String>,
}

impl Message {
    /// True when `handle` is the author or is explicitly mentioned.
    pub fn involves(&self, handle: &str) -> bool {
        self.author == handle || self.mentions.iter().any(|m| m == handle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub in_reply_to: Option<String>,
    pub truncated: bool,
}
