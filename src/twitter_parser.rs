use crate::twitter_message::{Event, Message, SystemEvent};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ApiTweet {
    id_str: Option<String>,
    id: Option<u64>,
    text: String,
    user: ApiUser,
    #[serde(default)]
    entities: Option<ApiEntities>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    screen_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiEntities {
    #[serde(default)]
    user_mentions: Option<Vec<ApiMention>>,
}

#[derive(Debug, Deserialize)]
struct ApiMention {
    #[serde(default)]
    screen_name: Option<String>,
}

/// Classify one user-stream record by its shape.
/// - `{"hangup": ...}` -> ConnectionDrop
/// - `{"event": "follow", ...}` -> System
/// - `{"text": ..., "user": {...}}` -> Message
/// - anything else -> Unrecognized
pub fn parse_record(record: Value) -> Event {
    let Some(fields) = record.as_object() else {
        return Event::Unrecognized;
    };

    if fields.contains_key("hangup") {
        return Event::ConnectionDrop;
    }

    if let Some(kind) = fields.get("event") {
        let kind = match kind {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Event::System(SystemEvent {
            kind,
            payload: record,
        });
    }

    if fields.contains_key("text") {
        return match serde_json::from_value::<ApiTweet>(record) {
            Ok(tweet) => tweet_to_event(tweet),
            Err(_) => Event::Unrecognized,
        };
    }

    Event::Unrecognized
}

fn tweet_to_event(tweet: ApiTweet) -> Event {
    let id = match (tweet.id_str, tweet.id) {
        (Some(id), _) => id,
        (None, Some(id)) => id.to_string(),
        (None, None) => return Event::Unrecognized,
    };

    Event::Message(Message {
        id,
        author: tweet.user.screen_name,
        text: tweet.text,
        mentions: tweet
            .entities
            .and_then(|e| e.user_mentions)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.screen_name)
            .collect(),
    })
}

/// Parse a replay script: a JSON array of stream records.
pub fn parse_script(input: &str) -> Result<Vec<Event>, serde_json::Error> {
    let records: Vec<Value> = serde_json::from_str(input)?;
    Ok(records.into_iter().map(parse_record).collect())
}
