use super::EventSource;
use crate::error::ConfigurationError;
use crate::twitter_message::Event;
use crate::twitter_parser::parse_script;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;

/// A scripted, finite stream for running the bot offline.
#[derive(Debug, Default)]
pub struct ReplaySource {
    events: VecDeque<Event>,
}

impl ReplaySource {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Load a JSON array of stream records.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigurationError::Unreadable {
                what: "replay script",
                path: path.to_path_buf(),
                source,
            })?;
        let events = parse_script(&content).map_err(|source| ConfigurationError::InvalidScript {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(events))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl EventSource for ReplaySource {
    async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.events.pop_front()? {
                // Nothing to reconnect to offline.
                Event::ConnectionDrop => continue,
                event => return Some(event),
            }
        }
    }
}
