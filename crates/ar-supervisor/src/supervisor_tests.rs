use super::*;
use crate::test_support::FakeSpawner;
use ar_core::FakeClock;
use ar_store::kv_memory::InMemoryStore;

fn test_supervisor() -> Supervisor<FakeSpawner> {
    let kv = Arc::new(InMemoryStore::new());
    let store = Arc::new(SessionStore::new(kv));
    let clock = Arc::new(FakeClock::new(1_000));
    Supervisor::new(Arc::new(FakeSpawner::default()), store, clock, SupervisorConfig::default())
}

#[tokio::test]
async fn create_session_rejects_blank_task() {
    let sup = test_supervisor();
    let err = sup
        .create_session("agent-1", "  ", "ws-1", "proj-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SupervisorError::InvalidArgument(_)));
}

#[tokio::test]
async fn create_session_enforces_concurrency_cap() {
    let mut config = SupervisorConfig::default();
    config.max_concurrent_sessions = 1;
    let kv = Arc::new(InMemoryStore::new());
    let store = Arc::new(SessionStore::new(kv));
    let clock = Arc::new(FakeClock::new(1_000));
    let sup = Supervisor::new(Arc::new(FakeSpawner::default()), store, clock, config);

    sup.create_session("agent-1", "task one", "ws-1", "proj-1", None)
        .await
        .unwrap();
    let err = sup
        .create_session("agent-2", "task two", "ws-1", "proj-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SupervisorError::ConcurrencyExceeded(_)));
}

#[tokio::test]
async fn create_session_then_lookup_by_agent_and_id() {
    let sup = test_supervisor();
    let handle = sup
        .create_session("agent-1", "build the thing", "ws-1", "proj-1", None)
        .await
        .unwrap();

    let by_id = sup.get_session(handle.session_id.as_str()).unwrap();
    assert_eq!(by_id.status, SessionStatus::Running);

    let by_agent = sup.get_session_by_agent("agent-1").unwrap();
    assert_eq!(by_agent.session_id, handle.session_id);

    assert_eq!(sup.get_all_sessions().len(), 1);
}

#[tokio::test]
async fn terminate_session_is_idempotent_for_unknown_id() {
    let sup = test_supervisor();
    sup.terminate_session("does-not-exist").await.unwrap();
}

#[tokio::test]
async fn send_command_fails_for_unknown_session() {
    let sup = test_supervisor();
    let err = sup.send_command("missing", "hello").await.unwrap_err();
    assert!(matches!(err, SupervisorError::NotFound(_)));
}
