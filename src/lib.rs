pub mod bot;
pub mod cli;
pub mod composer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod router;
pub mod sink;
pub mod stream;
pub mod twitter_message;
pub mod twitter_parser;

pub use bot::{Bot, RunStats, Stopped};
pub use corpus::LineCorpus;
pub use error::{ConfigurationError, SendFailure, TransportError};
pub use matcher::Matcher;
pub use router::{EventRouter, Routed};
pub use twitter_message::{Event, Message, Reply, SystemEvent, MAX_REPLY_CHARS};
