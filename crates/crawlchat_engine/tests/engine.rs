use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crawlchat_engine::{
    CrawlSummary, EngineEvent, EngineEvents, EngineHandle, FailureKind, ServiceError,
    ServiceTransport, StatusReport,
};

#[derive(Default)]
struct CountingTransport {
    crawls: AtomicUsize,
    chats: AtomicUsize,
}

#[async_trait::async_trait]
impl ServiceTransport for CountingTransport {
    async fn status(&self) -> Result<StatusReport, ServiceError> {
        Ok(StatusReport {
            has_documents: true,
            crawled_url: Some("https://example.com".to_string()),
            pages_count: Some(3),
        })
    }

    async fn crawl(&self, url: &str) -> Result<CrawlSummary, ServiceError> {
        self.crawls.fetch_add(1, Ordering::SeqCst);
        // Slow enough that the chat reply lands first.
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(CrawlSummary {
            message: Some(format!("crawled {url}")),
            pages_count: Some(1),
        })
    }

    async fn chat(&self, query: &str) -> Result<String, ServiceError> {
        self.chats.fetch_add(1, Ordering::SeqCst);
        if query == "fail" {
            return Err(ServiceError {
                kind: FailureKind::Rejected {
                    error: Some("no index".to_string()),
                },
                message: "service reported success: false".to_string(),
            });
        }
        Ok(format!("echo {query}"))
    }

    fn session_cookie(&self) -> Option<String> {
        Some("session=fake".to_string())
    }
}

fn next_event(events: &EngineEvents) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Some(event) = events.try_recv() {
            return event;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("no engine event within 5s");
}

#[test]
fn crawl_and_chat_run_concurrently() {
    let transport = Arc::new(CountingTransport::default());
    let (engine, events) = EngineHandle::start(transport.clone()).expect("engine");

    engine.crawl("https://example.com");
    engine.chat("hello");

    let first = next_event(&events);
    let second = next_event(&events);

    assert_eq!(first, EngineEvent::AnswerReceived(Ok("echo hello".to_string())));
    assert_eq!(
        second,
        EngineEvent::CrawlCompleted(Ok(CrawlSummary {
            message: Some("crawled https://example.com".to_string()),
            pages_count: Some(1),
        }))
    );
    assert_eq!(transport.crawls.load(Ordering::SeqCst), 1);
    assert_eq!(transport.chats.load(Ordering::SeqCst), 1);
}

#[test]
fn failures_come_back_as_events() {
    let (engine, events) =
        EngineHandle::start(Arc::new(CountingTransport::default())).expect("engine");
    engine.chat("fail");

    match events.recv() {
        Some(EngineEvent::AnswerReceived(Err(err))) => assert!(err.is_rejection()),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn status_and_cookie_pass_through() {
    let (engine, events) =
        EngineHandle::start(Arc::new(CountingTransport::default())).expect("engine");
    engine.fetch_status();

    match next_event(&events) {
        EngineEvent::StatusLoaded(Ok(status)) => assert_eq!(status.pages_count, Some(3)),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(engine.session_cookie().as_deref(), Some("session=fake"));
}

#[test]
fn requests_flow_while_another_thread_blocks_on_events() {
    let (engine, events) =
        EngineHandle::start(Arc::new(CountingTransport::default())).expect("engine");
    let (done_tx, done_rx) = std::sync::mpsc::channel();

    let pump = std::thread::spawn(move || {
        let mut received = Vec::new();
        while received.len() < 2 {
            match events.recv() {
                Some(event) => received.push(event),
                None => break,
            }
        }
        let _ = done_tx.send(received);
    });

    // The consumer is already parked in recv before anything is sent.
    std::thread::sleep(Duration::from_millis(50));
    engine.fetch_status();
    engine.chat("hello");
    assert_eq!(engine.session_cookie().as_deref(), Some("session=fake"));

    let received = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("pump thread stalled");
    pump.join().expect("pump thread panicked");
    assert_eq!(received.len(), 2);
    assert!(received.contains(&EngineEvent::AnswerReceived(Ok("echo hello".to_string()))));
}
