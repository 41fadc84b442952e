// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Health Monitor: periodic sweep that reclaims sessions
//! whose heartbeat has gone stale without ever hearing their own exit.
//!
//! Scans the Session Store directly rather than the Supervisor's
//! in-process map, so a session whose handle was lost (daemon restart,
//! map eviction) but still sits stale in the Store is reclaimed too.

use crate::notifications::SupervisorNotification;
use crate::spawner::Spawner;
use crate::supervisor::Supervisor;
use ar_core::{Clock, SessionStatus};
use ar_store::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{ProcessExt, System, SystemExt};
use tokio::sync::broadcast;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct HealthMonitorConfig {
    pub sweep_interval: Duration,
    pub stale_threshold: Duration,
}

impl Default for HealthMonitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
            stale_threshold: Duration::from_secs(300),
        }
    }
}

/// Outcome of one sweep, useful for tests and for the `HealthCheckComplete`
/// notification's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub checked: usize,
    pub reclaimed: Vec<String>,
    pub total: usize,
    pub active: usize,
    pub stale: usize,
    pub terminated: usize,
}

pub struct HealthMonitor<S: Spawner + 'static> {
    supervisor: Supervisor<S>,
    store: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    config: HealthMonitorConfig,
    notify_tx: broadcast::Sender<SupervisorNotification>,
}

impl<S: Spawner + 'static> HealthMonitor<S> {
    pub fn new(
        supervisor: Supervisor<S>,
        store: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
        config: HealthMonitorConfig,
        notify_tx: broadcast::Sender<SupervisorNotification>,
    ) -> Self {
        Self {
            supervisor,
            store,
            clock,
            config,
            notify_tx,
        }
    }

    /// Run one sweep immediately (the first sweep on startup runs without
    /// waiting a full interval).
    pub async fn sweep_once(&self) -> SweepReport {
        let now = self.clock.now_ms();
        let threshold_ms = self.config.stale_threshold.as_millis() as i64;
        let mut report = SweepReport::default();

        let session_ids = match self
            .store
            .get_all_session_ids(ar_store::session_store::MAX_SCAN_RESULTS)
            .await
        {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "health sweep failed to list sessions from the store");
                return report;
            }
        };

        for session_id in session_ids {
            let record = match self.store.get_session(&session_id).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!(session_id, error = %e, "health sweep failed to read session from the store");
                    continue;
                }
            };
            report.total += 1;

            match record.status {
                SessionStatus::Terminated => {
                    report.terminated += 1;
                    continue;
                }
                SessionStatus::Idle => continue,
                SessionStatus::Running => {}
            }

            report.checked += 1;
            let age_ms = now - record.last_heartbeat_ms;
            if age_ms < threshold_ms {
                report.active += 1;
                continue;
            }
            report.stale += 1;

            warn!(
                session_id = %record.session_id,
                age_ms,
                "reclaiming stale session"
            );
            let _ = self.notify_tx.send(SupervisorNotification::SessionStale {
                session_id: record.session_id.clone(),
                agent_id: record.agent_id.clone(),
                last_heartbeat_ms: record.last_heartbeat_ms,
            });

            if let Err(e) = self
                .supervisor
                .terminate_session(record.session_id.as_str())
                .await
            {
                warn!(session_id = %record.session_id, error = %e, "failed to terminate stale session");
            }
            // Defensive: whether termination succeeded, failed, or the
            // session had no live handle at all, make sure the record
            // can't be reclaimed again on the next pass.
            if let Err(e) = self
                .store
                .update_status(record.session_id.as_str(), SessionStatus::Terminated, Some(now))
                .await
            {
                warn!(session_id = %record.session_id, error = %e, "failed to mark stale session terminated in the store");
            }
            report.reclaimed.push(record.session_id.as_str().to_string());
        }

        info!(
            checked = report.checked,
            reclaimed = report.reclaimed.len(),
            "health sweep complete"
        );

        let _ = self.notify_tx.send(SupervisorNotification::HealthCheckComplete {
            total: report.total,
            active: report.active,
            stale: report.stale,
            terminated: report.terminated,
            memory_kb: current_process_memory_kb(),
            timestamp: self.clock.now_iso(),
        });

        report
    }

    /// Run forever at `sweep_interval`, starting with an immediate sweep.
    pub async fn run(self: Arc<Self>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            self.sweep_once().await;
            tokio::select! {
                _ = tokio::time::sleep(self.config.sweep_interval) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}

/// Resident memory of the current process, in kilobytes. `None` if the
/// running process can't be found in the process table.
fn current_process_memory_kb() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|p| p.memory())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupervisorConfig;
    use crate::test_support::FakeSpawner;
    use ar_core::{AgentId, FakeClock, ProjectId, Session, SessionId, WorkspaceId};
    use ar_store::kv_memory::InMemoryStore;

    fn monitor(
        clock: Arc<FakeClock>,
        store: Arc<SessionStore>,
    ) -> (Supervisor<FakeSpawner>, HealthMonitor<FakeSpawner>) {
        let sup = Supervisor::new(
            Arc::new(FakeSpawner::default()),
            store.clone(),
            clock.clone() as Arc<dyn Clock>,
            SupervisorConfig::default(),
        );
        let notify_tx = sup.notifier();
        let hm = HealthMonitor::new(
            sup.clone(),
            store,
            clock as Arc<dyn Clock>,
            HealthMonitorConfig::default(),
            notify_tx,
        );
        (sup, hm)
    }

    fn sample_session(id: &str, last_heartbeat_ms: i64) -> Session {
        Session {
            session_id: SessionId::new(id),
            workspace_id: WorkspaceId::new("ws-1"),
            project_id: ProjectId::new("proj-1"),
            agent_id: AgentId::new(format!("agent-{id}")),
            pid: 4242,
            status: SessionStatus::Running,
            task: "run tests".to_string(),
            started_at_ms: 0,
            last_heartbeat_ms,
            terminated_at_ms: None,
        }
    }

    #[tokio::test]
    async fn sweep_with_no_sessions_is_a_noop() {
        let clock = Arc::new(FakeClock::new(0));
        let store = Arc::new(SessionStore::new(Arc::new(InMemoryStore::new())));
        let (_sup, hm) = monitor(clock, store);
        let report = hm.sweep_once().await;
        assert_eq!(report.checked, 0);
        assert!(report.reclaimed.is_empty());
    }

    #[tokio::test]
    async fn reclaims_session_stale_in_store_but_absent_from_supervisor_map() {
        let clock = Arc::new(FakeClock::new(1_000_000));
        let store = Arc::new(SessionStore::new(Arc::new(InMemoryStore::new())));
        // Heartbeat long before the default 300s stale threshold, and never
        // registered with the Supervisor's in-memory map at all.
        store
            .store_session(&sample_session("sess-orphan", 0))
            .await
            .unwrap();

        let (_sup, hm) = monitor(clock, store.clone());
        let mut notifications = hm.notify_tx.subscribe();
        let report = hm.sweep_once().await;

        assert_eq!(report.reclaimed, vec!["sess-orphan".to_string()]);
        let record = store.get_session("sess-orphan").await.unwrap().unwrap();
        assert_eq!(record.status, SessionStatus::Terminated);

        let mut saw_stale = false;
        while let Ok(n) = notifications.try_recv() {
            if matches!(n, SupervisorNotification::SessionStale { .. }) {
                saw_stale = true;
            }
        }
        assert!(saw_stale, "expected a SessionStale notification");
    }

    #[tokio::test]
    async fn fresh_heartbeat_is_not_reclaimed() {
        let clock = Arc::new(FakeClock::new(1_000));
        let store = Arc::new(SessionStore::new(Arc::new(InMemoryStore::new())));
        store
            .store_session(&sample_session("sess-fresh", 900))
            .await
            .unwrap();

        let (_sup, hm) = monitor(clock, store.clone());
        let report = hm.sweep_once().await;
        assert!(report.reclaimed.is_empty());
        assert_eq!(report.active, 1);
        let record = store.get_session("sess-fresh").await.unwrap().unwrap();
        assert_eq!(record.status, SessionStatus::Running);
    }

    #[tokio::test]
    async fn publishes_health_check_complete_snapshot() {
        let clock = Arc::new(FakeClock::new(1_000_000));
        let store = Arc::new(SessionStore::new(Arc::new(InMemoryStore::new())));
        store
            .store_session(&sample_session("sess-stale", 0))
            .await
            .unwrap();
        store
            .store_session(&sample_session("sess-active", 999_900))
            .await
            .unwrap();

        let (_sup, hm) = monitor(clock, store);
        let mut notifications = hm.notify_tx.subscribe();
        hm.sweep_once().await;

        let mut snapshot = None;
        while let Ok(n) = notifications.try_recv() {
            if let SupervisorNotification::HealthCheckComplete { total, active, stale, .. } = n {
                snapshot = Some((total, active, stale));
            }
        }
        assert_eq!(snapshot, Some((2, 1, 1)));
    }
}
