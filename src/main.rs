use anyhow::Result;
use clap::Parser;
use lyrebird::cli::Cli;
use lyrebird::sink::{LogSink, ReplySink, TwitterSink};
use lyrebird::stream::{EventSource, HttpConnector, LiveSource, ReplaySource};
use lyrebird::{logging, Bot, EventRouter, LineCorpus, Matcher};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    logging::init_tracing(&config.log_level, cli.log_file.as_deref())?;

    let corpus = LineCorpus::load_file(&config.corpus)?;

    let source: Box<dyn EventSource>;
    let sink: Box<dyn ReplySink>;
    match &cli.local {
        Some(script) => {
            source = Box::new(ReplaySource::from_file(script)?);
            sink = Box::new(LogSink);
        }
        None => {
            let token = config.bearer_token()?;
            let connector = HttpConnector::new(&config.twitter, token.clone());
            let retry = Duration::from_secs(config.twitter.connect_retry_secs);
            source = Box::new(LiveSource::new(connector, retry));
            sink = Box::new(TwitterSink::new(&config.twitter, token));
        }
    }

    let mut router = EventRouter::new(config.handle.clone(), Matcher::new(), sink);
    router.on_event("follow", |event| {
        let follower = event.payload["source"]["screen_name"]
            .as_str()
            .unwrap_or("unknown");
        tracing::info!("followed by @{}", follower);
    });

    let mut bot = Bot::new(source, router, config.corpus.clone()).with_corpus(corpus);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            on_signal.cancel();
        }
    });

    let stopped = bot.run(cancel).await?;
    tracing::info!(?stopped, stats = ?bot.stats(), "bot stopped");
    Ok(())
}
