use crate::corpus::LineCorpus;
use crate::error::ConfigurationError;
use crate::router::{EventRouter, Routed};
use crate::stream::EventSource;
use rand::Rng;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// Why `Bot::run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    SourceExhausted,
    Cancelled,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub events: usize,
    pub replies: usize,
    pub failed_sends: usize,
}

/// The whole pipeline: one source, one router, one corpus.
pub struct Bot<R: Rng> {
    source: Box<dyn EventSource>,
    router: EventRouter<R>,
    corpus_path: PathBuf,
    corpus: Option<LineCorpus>,
    stats: RunStats,
}

impl<R: Rng> Bot<R> {
    /// The corpus at `corpus_path` is read on the first `run` unless one is supplied with `with_corpus`.
    pub fn new(source: Box<dyn EventSource>, router: EventRouter<R>, corpus_path: PathBuf) -> Self {
        Self {
            source,
            router,
            corpus_path,
            corpus: None,
            stats: RunStats::default(),
        }
    }

    pub fn with_corpus(mut self, corpus: LineCorpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn router_mut(&mut self) -> &mut EventRouter<R> {
        &mut self.router
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Re-read the corpus file. The old lines stay in place if this fails.
    pub fn reload_corpus(&mut self) -> Result<(), ConfigurationError> {
        let corpus = LineCorpus::load_file(&self.corpus_path)?;
        tracing::info!(lines = corpus.len(), "corpus reloaded");
        self.corpus = Some(corpus);
        Ok(())
    }

    /// Pull and route events until the source runs dry or `cancel` fires.
    /// Cancellation is only observed while waiting for the next event.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<Stopped, ConfigurationError> {
        if self.corpus.is_none() {
            self.reload_corpus()?;
        }
        let Some(corpus) = self.corpus.as_ref() else {
            return Err(ConfigurationError::EmptyCorpus(
                self.corpus_path.display().to_string(),
            ));
        };
        tracing::info!(handle = self.router.handle(), lines = corpus.len(), "bot running");

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(Stopped::Cancelled),
                event = self.source.next_event() => event,
            };
            let Some(event) = event else {
                tracing::info!(stats = ?self.stats, "event source exhausted");
                return Ok(Stopped::SourceExhausted);
            };

            tracing::debug!("TWEET: {:?}", event);
            self.stats.events += 1;
            match self.router.route(event, corpus).await {
                Routed::Replied(_) => self.stats.replies += 1,
                Routed::SendFailed(_) => self.stats.failed_sends += 1,
                _ => {}
            }
        }
    }
}
