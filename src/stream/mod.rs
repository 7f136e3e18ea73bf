pub mod live;
pub mod replay;

pub use live::{Connection, Connector, HttpConnector, LiveSource};
pub use replay::ReplaySource;

use crate::twitter_message::Event;
use async_trait::async_trait;

/// A possibly endless sequence of events. `next_event` is the only place the bot waits.
#[async_trait]
pub trait EventSource: Send {
    /// `None` means the source is exhausted. Live sources never return it.
    async fn next_event(&mut self) -> Option<Event>;
}
