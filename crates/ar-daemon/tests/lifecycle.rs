//! Integration tests composing the Supervisor, Health Monitor, and Stream
//! Publisher the way `Daemon::build` wires them, against an in-memory
//! store and a fake spawner.

use ar_core::{Clock, FakeClock};
use ar_store::kv_memory::InMemoryStore;
use ar_store::{KeyValueStore, SessionStore};
use ar_stream::{PublisherConfig, StreamPublisher};
use ar_supervisor::test_support::FakeSpawner;
use ar_supervisor::{HealthMonitor, HealthMonitorConfig, Supervisor, SupervisorConfig, SupervisorNotification};
use std::sync::Arc;
use std::time::Duration;

fn supervisor(clock: Arc<FakeClock>) -> (Supervisor<FakeSpawner>, Arc<SessionStore>) {
    let kv = Arc::new(InMemoryStore::new());
    let store = Arc::new(SessionStore::new(kv));
    let sup = Supervisor::new(
        Arc::new(FakeSpawner::default()),
        store.clone(),
        clock as Arc<dyn Clock>,
        SupervisorConfig::default(),
    );
    (sup, store)
}

#[tokio::test]
async fn spawn_to_terminate_round_trip_removes_the_session() {
    let clock = Arc::new(FakeClock::new(0));
    let (sup, _store) = supervisor(clock);

    let handle = sup
        .create_session("agent-1", "write a README", "workspace-1", "project-1", None)
        .await
        .unwrap();

    assert!(sup.get_session(handle.session_id.as_str()).is_some());

    sup.terminate_session(handle.session_id.as_str()).await.unwrap();

    assert!(sup.get_session(handle.session_id.as_str()).is_none());
    assert!(sup.get_session_by_agent("agent-1").is_none());
}

#[tokio::test]
async fn stale_session_is_reclaimed_by_the_health_monitor() {
    let clock = Arc::new(FakeClock::new(0));
    let (sup, store) = supervisor(clock.clone());

    let handle = sup
        .create_session("agent-2", "long running task", "workspace-1", "project-1", None)
        .await
        .unwrap();

    let mut notifications = sup.subscribe();

    clock.advance_ms(Duration::from_secs(301).as_millis() as i64);

    let monitor = HealthMonitor::new(
        sup.clone(),
        store,
        clock.clone() as Arc<dyn Clock>,
        HealthMonitorConfig::default(),
        sup.notifier(),
    );
    let report = monitor.sweep_once().await;

    assert_eq!(report.checked, 1);
    assert_eq!(report.reclaimed, vec![handle.session_id.as_str().to_string()]);
    assert!(sup.get_session(handle.session_id.as_str()).is_none());

    let mut saw_stale = false;
    while let Ok(notification) = notifications.try_recv() {
        if matches!(notification, SupervisorNotification::SessionStale { .. }) {
            saw_stale = true;
        }
    }
    assert!(saw_stale, "expected a SessionStale notification");
}

#[tokio::test]
async fn publisher_batches_events_and_drains_on_shutdown() {
    let clock = Arc::new(FakeClock::new(0));
    let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let publisher = Arc::new(StreamPublisher::new(kv, clock as Arc<dyn Clock>, PublisherConfig::default()));

    for i in 0..5 {
        publisher.enqueue(sample_event(i));
    }

    // Below max_batch_size, so nothing has flushed yet via the batch timer.
    assert_eq!(publisher.metrics().events_published, 0);

    publisher.shutdown().await;

    assert_eq!(publisher.metrics().events_published, 5);
}

fn sample_event(line_number: u64) -> ar_core::StreamEvent {
    ar_core::StreamEvent {
        session_id: ar_core::SessionId::new("s1"),
        agent_id: ar_core::AgentId::new("a1"),
        project_id: ar_core::ProjectId::new("p1"),
        workspace_id: ar_core::WorkspaceId::new("w1"),
        event_type: ar_core::StreamEventType::Output,
        content: "hello".to_string(),
        timestamp: "1970-01-01T00:00:00.000Z".to_string(),
        line_number,
        metadata: None,
    }
}
