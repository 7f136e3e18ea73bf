use crate::config::TwitterConfig;
use crate::error::SendFailure;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Where composed replies go.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, text: &str, reply_to: Option<&str>) -> Result<(), SendFailure>;
}

/// Posts replies as statuses.
pub struct TwitterSink {
    update_url: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    id_str: Option<String>,
}

impl TwitterSink {
    pub fn new(config: &TwitterConfig, token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("lyrebird/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            update_url: config.update_url.clone(),
            token,
            client,
        }
    }
}

#[async_trait]
impl ReplySink for TwitterSink {
    async fn send(&self, text: &str, reply_to: Option<&str>) -> Result<(), SendFailure> {
        let mut params = vec![("status", text)];
        if let Some(id) = reply_to {
            params.push(("in_reply_to_status_id", id));
        }

        let response = self
            .client
            .post(&self.update_url)
            .bearer_auth(&self.token)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SendFailure(format!("Twitter API error: {}", response.status())));
        }

        // The status is already posted; the body only feeds the debug log.
        match response.json::<ApiStatus>().await {
            Ok(status) => tracing::debug!(id = ?status.id_str, "status posted"),
            Err(e) => tracing::debug!("status posted, unreadable response body: {}", e),
        }
        Ok(())
    }
}

/// Offline sink: replies are only logged.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ReplySink for LogSink {
    async fn send(&self, text: &str, reply_to: Option<&str>) -> Result<(), SendFailure> {
        tracing::info!(reply_to, "SEND: \"{}\"", text);
        Ok(())
    }
}
