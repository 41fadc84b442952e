use super::*;
use ar_core::{AgentId, FakeClock, ProjectId, SessionId, StreamEventType, WorkspaceId};
use ar_store::InMemoryStore;

fn event(line: u64) -> StreamEvent {
    StreamEvent {
        session_id: SessionId::new("s1"),
        agent_id: AgentId::new("a1"),
        project_id: ProjectId::new("p1"),
        workspace_id: WorkspaceId::new("ws-1"),
        event_type: StreamEventType::Output,
        content: format!("line-{line}"),
        timestamp: "1970-01-01T00:00:00.000Z".to_string(),
        line_number: line,
        metadata: None,
    }
}

#[tokio::test]
async fn two_arrivals_within_the_batch_window_publish_together() {
    let store = Arc::new(InMemoryStore::new());
    let publisher = StreamPublisher::new(
        store.clone(),
        Arc::new(FakeClock::new(0)),
        PublisherConfig::default(),
    );
    publisher.enqueue(event(1));
    tokio::time::sleep(Duration::from_millis(50)).await;
    publisher.enqueue(event(2));

    tokio::time::sleep(Duration::from_millis(120)).await;

    assert_eq!(store.published_messages().len(), 2);
    assert_eq!(publisher.metrics().batches_published, 1);
}

#[tokio::test]
async fn max_batch_size_triggers_immediate_flush() {
    let store = Arc::new(InMemoryStore::new());
    let mut config = PublisherConfig::default();
    config.max_batch_size = 2;
    config.batch_window = Duration::from_secs(10);
    let publisher = StreamPublisher::new(store.clone(), Arc::new(FakeClock::new(0)), config);

    publisher.enqueue(event(1));
    publisher.enqueue(event(2));
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(store.published_messages().len(), 2);
}

#[tokio::test]
async fn shutdown_flushes_pending_events_and_stops_further_enqueues() {
    let store = Arc::new(InMemoryStore::new());
    let mut config = PublisherConfig::default();
    config.batch_window = Duration::from_secs(10);
    let publisher = StreamPublisher::new(store.clone(), Arc::new(FakeClock::new(0)), config);

    publisher.enqueue(event(1));
    publisher.shutdown().await;
    assert_eq!(store.published_messages().len(), 1);

    publisher.enqueue(event(2));
    publisher.flush().await;
    assert_eq!(store.published_messages().len(), 1);
}

#[tokio::test]
async fn metrics_track_published_events() {
    let store = Arc::new(InMemoryStore::new());
    let publisher = StreamPublisher::new(
        store.clone(),
        Arc::new(FakeClock::new(0)),
        PublisherConfig::default(),
    );
    publisher.enqueue(event(1));
    publisher.flush().await;
    let metrics = publisher.metrics();
    assert_eq!(metrics.events_published, 1);
    assert_eq!(metrics.publish_failures, 0);
}
