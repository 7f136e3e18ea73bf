use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup problems. Nothing else is allowed to stop the bot.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("corpus '{0}' contains no usable lines")]
    EmptyCorpus(String),

    #[error("failed to read {what} '{}': {source}", .path.display())]
    Unreadable {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid replay script '{}': {source}", .path.display())]
    InvalidScript {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Problems talking to the event stream. Always absorbed by the live source.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("stream read failed: {0}")]
    Read(String),

    #[error("malformed stream record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A reply the output sink could not deliver.
#[derive(Debug, Error)]
#[error("send failed: {0}")]
pub struct SendFailure(pub String);

impl From<reqwest::Error> for SendFailure {
    fn from(err: reqwest::Error) -> Self {
        Self(err.to_string())
    }
}
