use super::EventSource;
use crate::config::TwitterConfig;
use crate::error::TransportError;
use crate::twitter_message::Event;
use crate::twitter_parser::parse_record;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde_json::Value;
use std::time::Duration;

/// One open stream. `Ok(None)` means the server closed it.
#[async_trait]
pub trait Connection: Send {
    async fn next_record(&mut self) -> Result<Option<Value>, TransportError>;
}

/// Opens (and re-opens) the stream.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError>;
}

/// A stream that survives hangups: every disconnect is followed by a fresh
/// connect, and the caller only ever sees real events.
pub struct LiveSource<C: Connector> {
    connector: C,
    connection: Option<Box<dyn Connection>>,
    retry_delay: Duration,
    reconnects: usize,
}

impl<C: Connector> LiveSource<C> {
    pub fn new(connector: C, retry_delay: Duration) -> Self {
        Self {
            connector,
            connection: None,
            retry_delay,
            reconnects: 0,
        }
    }

    /// Number of times the stream was re-opened after a drop.
    pub fn reconnects(&self) -> usize {
        self.reconnects
    }

    async fn open(connector: &C, retry_delay: Duration) -> Box<dyn Connection> {
        loop {
            match connector.connect().await {
                Ok(connection) => {
                    tracing::info!("stream opened");
                    return connection;
                }
                Err(e) => {
                    tracing::error!(retry_in = ?retry_delay, "{}", e);
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }
    }

    fn drop_connection(&mut self, reason: &str) {
        tracing::warn!("{}, reconnecting", reason);
        self.connection = None;
        self.reconnects += 1;
    }
}

#[async_trait]
impl<C: Connector> EventSource for LiveSource<C> {
    async fn next_event(&mut self) -> Option<Event> {
        loop {
            if self.connection.is_none() {
                let connection = Self::open(&self.connector, self.retry_delay).await;
                self.connection = Some(connection);
            }
            let Some(connection) = self.connection.as_mut() else {
                continue;
            };

            match connection.next_record().await {
                Ok(Some(record)) => match parse_record(record) {
                    Event::ConnectionDrop => self.drop_connection("stream hung up"),
                    event => return Some(event),
                },
                Ok(None) => self.drop_connection("stream closed"),
                Err(TransportError::Malformed(e)) => {
                    tracing::debug!("skipping malformed record: {}", e);
                }
                Err(e) => self.drop_connection(&e.to_string()),
            }
        }
    }
}

/// Opens the user stream over HTTP.
pub struct HttpConnector {
    stream_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpConnector {
    pub fn new(config: &TwitterConfig, token: String) -> Self {
        // No overall timeout: the response body is meant to stay open.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lyrebird/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            stream_url: config.stream_url.clone(),
            token,
            client,
        }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError> {
        let response = self
            .client
            .get(&self.stream_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Connect(format!(
                "Twitter stream error: {}",
                response.status()
            )));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(Box::new(HttpConnection {
            body,
            decoder: RecordDecoder::default(),
        }))
    }
}

struct HttpConnection {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: RecordDecoder,
}

#[async_trait]
impl Connection for HttpConnection {
    async fn next_record(&mut self) -> Result<Option<Value>, TransportError> {
        loop {
            if let Some(line) = self.decoder.next_line() {
                return Ok(Some(serde_json::from_str(&line)?));
            }
            if self.decoder.overflowed() {
                return Err(TransportError::Read(format!(
                    "record longer than {} bytes",
                    self.decoder.limit
                )));
            }
            match self.body.next().await {
                Some(Ok(chunk)) => self.decoder.push(&chunk),
                Some(Err(e)) => return Err(TransportError::Read(e.to_string())),
                // A partial trailing record is lost with the connection.
                None => return Ok(None),
            }
        }
    }
}

/// Longest record accepted before the connection is treated as broken.
const MAX_RECORD_BYTES: usize = 1 << 20;

/// Splits the chunked body into newline-delimited records, dropping keep-alive blank lines.
#[derive(Debug)]
struct RecordDecoder {
    buf: Vec<u8>,
    /// Bytes of `buf` already known to hold no newline.
    scanned: usize,
    limit: usize,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_RECORD_BYTES)
    }
}

impl RecordDecoder {
    fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            scanned: 0,
            limit,
        }
    }

    fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// True when the pending partial record has outgrown the limit.
    fn overflowed(&self) -> bool {
        self.buf.len() > self.limit
    }

    fn next_line(&mut self) -> Option<String> {
        loop {
            let Some(offset) = self.buf[self.scanned..].iter().position(|&b| b == b'\n') else {
                self.scanned = self.buf.len();
                return None;
            };
            let raw: Vec<u8> = self.buf.drain(..=self.scanned + offset).collect();
            self.scanned = 0;
            let line = String::from_utf8_lossy(&raw).trim().to_string();
            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}
