use crate::composer::build_reply;
use crate::corpus::LineCorpus;
use crate::matcher::Matcher;
use crate::sink::ReplySink;
use crate::twitter_message::{Event, Message, Reply, SystemEvent};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashMap;

pub type EventHandler = Box<dyn Fn(&SystemEvent) + Send + Sync>;

/// What happened to one routed event.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Replied(Reply),
    SendFailed(Reply),
    SelfAuthored,
    NotMentioned,
    EventHandled(String),
    EventUnhandled(String),
    Ignored,
}

/// Decides what to do with each event. Holds no per-event state.
pub struct EventRouter<R: Rng = StdRng> {
    handle: String,
    matcher: Matcher<R>,
    sink: Box<dyn ReplySink>,
    handlers: HashMap<String, EventHandler>,
}

impl<R: Rng> EventRouter<R> {
    pub fn new(handle: impl Into<String>, matcher: Matcher<R>, sink: Box<dyn ReplySink>) -> Self {
        Self {
            handle: handle.into(),
            matcher,
            sink,
            handlers: HashMap::new(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Register a callback for a system event kind such as "follow". Replaces any previous one.
    pub fn on_event<F>(&mut self, kind: impl Into<String>, handler: F)
    where
        F: Fn(&SystemEvent) + Send + Sync + 'static,
    {
        self.handlers.insert(kind.into(), Box::new(handler));
    }

    pub async fn route(&mut self, event: Event, corpus: &LineCorpus) -> Routed {
        match event {
            Event::System(event) => self.route_system(&event),
            Event::Message(message) => {
                tracing::info!("HANDLING TWEET: @{}: \"{}\"", message.author, message.text);
                self.route_message(&message, corpus).await
            }
            Event::ConnectionDrop | Event::Unrecognized => Routed::Ignored,
        }
    }

    fn route_system(&self, event: &SystemEvent) -> Routed {
        match self.handlers.get(&event.kind) {
            Some(handler) => {
                tracing::info!("HANDLING EVENT \"{}\".", event.kind);
                handler(event);
                Routed::EventHandled(event.kind.clone())
            }
            None => {
                tracing::info!("UNHANDLED EVENT \"{}\".", event.kind);
                Routed::EventUnhandled(event.kind.clone())
            }
        }
    }

    async fn route_message(&mut self, message: &Message, corpus: &LineCorpus) -> Routed {
        if message.author == self.handle {
            return Routed::SelfAuthored;
        }
        if !message.involves(&self.handle) {
            tracing::info!("NOT IN THAT TWEET");
            return Routed::NotMentioned;
        }

        let line = self.matcher.select(&message.text, corpus);
        let reply = build_reply(message, &self.handle, line);

        match self
            .sink
            .send(&reply.text, reply.in_reply_to.as_deref())
            .await
        {
            Ok(()) => Routed::Replied(reply),
            Err(e) => {
                tracing::warn!(reply_to = ?reply.in_reply_to, "{}", e);
                Routed::SendFailed(reply)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::tests::RecordingSink;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct SharedSink(Arc<RecordingSink>);

    #[async_trait::async_trait]
    impl ReplySink for SharedSink {
        async fn send(
            &self,
            text: &str,
            reply_to: Option<&str>,
        ) -> Result<(), crate::error::SendFailure> {
            self.0.send(text, reply_to).await
        }
    }

    fn corpus() -> LineCorpus {
        LineCorpus::load(
            Cursor::new("i knew you were trouble\nwe are never getting back together\nshake it off\n"),
            "test",
        )
        .unwrap()
    }

    fn router(sink: RecordingSink) -> (EventRouter, Arc<RecordingSink>) {
        let sink = Arc::new(sink);
        let router = EventRouter::new(
            "pyswizzle",
            Matcher::seeded(11),
            Box::new(SharedSink(sink.clone())),
        );
        (router, sink)
    }

    fn tweet(author: &str, mentions: &[&str], text: &str) -> Event {
        Event::Message(Message {
            id: "900".to_string(),
            author: author.to_string(),
            text: text.to_string(),
            mentions: mentions.iter().map(|m| m.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_mention_gets_reply() {
        let (mut router, sink) = router(RecordingSink::default());
        let routed = router
            .route(
                tweet("alice", &["pyswizzle"], "i knew you were trouble when you walked in"),
                &corpus(),
            )
            .await;

        let expected = "@alice i knew you were trouble".to_string();
        assert!(matches!(&routed, Routed::Replied(r) if r.text == expected));
        assert_eq!(sink.sent(), vec![(expected, Some("900".to_string()))]);
    }

    #[tokio::test]
    async fn test_own_tweet_never_answered() {
        let (mut router, sink) = router(RecordingSink::default());
        let routed = router
            .route(tweet("pyswizzle", &["alice"], "shake it off"), &corpus())
            .await;
        assert_eq!(routed, Routed::SelfAuthored);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_tweet_without_mention_ignored() {
        let (mut router, sink) = router(RecordingSink::default());
        let routed = router
            .route(tweet("alice", &["bob"], "pyswizzle is great"), &corpus())
            .await;
        assert_eq!(routed, Routed::NotMentioned);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_is_not_fatal() {
        let (mut router, sink) = router(RecordingSink::failing());
        let corpus = corpus();
        let first = router
            .route(tweet("alice", &["pyswizzle"], "shake"), &corpus)
            .await;
        let second = router
            .route(tweet("bob", &["pyswizzle"], "shake"), &corpus)
            .await;
        assert!(matches!(first, Routed::SendFailed(_)));
        assert!(matches!(second, Routed::SendFailed(_)));
        assert_eq!(sink.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_registered_handler_runs() {
        let (mut router, sink) = router(RecordingSink::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        router.on_event("follow", move |event| {
            assert_eq!(event.payload["source"]["screen_name"], "alice");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let event = Event::System(SystemEvent {
            kind: "follow".to_string(),
            payload: json!({"event": "follow", "source": {"screen_name": "alice"}}),
        });
        let routed = router.route(event, &corpus()).await;

        assert_eq!(routed, Routed::EventHandled("follow".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sink.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unhandled_event_discarded() {
        let (mut router, _) = router(RecordingSink::default());
        let event = Event::System(SystemEvent {
            kind: "favorite".to_string(),
            payload: json!({"event": "favorite"}),
        });
        assert_eq!(
            router.route(event, &corpus()).await,
            Routed::EventUnhandled("favorite".to_string())
        );
    }

    #[tokio::test]
    async fn test_unrecognized_and_drop_ignored() {
        let (mut router, sink) = router(RecordingSink::default());
        assert_eq!(router.route(Event::Unrecognized, &corpus()).await, Routed::Ignored);
        assert_eq!(router.route(Event::ConnectionDrop, &corpus()).await, Routed::Ignored);
        assert!(sink.sent().is_empty());
    }
}
