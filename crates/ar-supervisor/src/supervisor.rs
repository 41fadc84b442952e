// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session Supervisor: process lifecycle, heartbeats, and
//! output plumbing for long-lived CLI agent sessions.

use crate::config::SupervisorConfig;
use crate::error::SupervisorError;
use crate::notifications::{SupervisorNotification, NOTIFICATION_CHANNEL_CAPACITY};
use crate::ring::RingBuffer;
use crate::spawner::{default_working_directory, ProcessControl, Spawner};
use ar_core::id::validate_id;
use ar_core::{AgentId, Clock, OutputEvent, OutputEventType, ProjectId, Session, SessionId, SessionStatus, WorkspaceId};
use ar_store::SessionStore;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Lightweight handle returned by `create_session`: identity only, all
/// further interaction goes back through the Supervisor by `session_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub agent_id: AgentId,
    pub pid: u32,
}

struct SessionEntry {
    session: RwLock<Session>,
    control: Arc<dyn ProcessControl>,
    stdin_tx: tokio::sync::mpsc::Sender<String>,
    line_counter: AtomicU64,
    ring: Mutex<RingBuffer>,
    heartbeat_task: Mutex<Option<JoinHandle<()>>>,
    exited: Arc<Notify>,
}

pub struct Supervisor<S: Spawner + 'static> {
    spawner: Arc<S>,
    store: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    config: SupervisorConfig,
    by_session: Arc<RwLock<HashMap<String, Arc<SessionEntry>>>>,
    by_agent: Arc<RwLock<HashMap<String, String>>>,
    notify_tx: broadcast::Sender<SupervisorNotification>,
}

impl<S: Spawner + 'static> Clone for Supervisor<S> {
    fn clone(&self) -> Self {
        Self {
            spawner: self.spawner.clone(),
            store: self.store.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
            by_session: self.by_session.clone(),
            by_agent: self.by_agent.clone(),
            notify_tx: self.notify_tx.clone(),
        }
    }
}

impl<S: Spawner + 'static> Supervisor<S> {
    pub fn new(spawner: Arc<S>, store: Arc<SessionStore>, clock: Arc<dyn Clock>, config: SupervisorConfig) -> Self {
        let (notify_tx, _rx) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self {
            spawner,
            store,
            clock,
            config,
            by_session: Arc::new(RwLock::new(HashMap::new())),
            by_agent: Arc::new(RwLock::new(HashMap::new())),
            notify_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorNotification> {
        self.notify_tx.subscribe()
    }

    /// Clone of the internal notification sender, for components (the
    /// Health Monitor) that need to publish alongside the Supervisor rather
    /// than only listen.
    pub fn notifier(&self) -> broadcast::Sender<SupervisorNotification> {
        self.notify_tx.clone()
    }

    pub async fn create_session(
        &self,
        agent_id: impl Into<String>,
        task: impl Into<String>,
        workspace_id: impl Into<String>,
        project_id: impl Into<String>,
        working_directory: Option<PathBuf>,
    ) -> Result<SessionHandle, SupervisorError> {
        let agent_id = agent_id.into();
        let task = task.into();
        let workspace_id = workspace_id.into();
        let project_id = project_id.into();

        validate_id("agentId", &agent_id).map_err(|e| SupervisorError::InvalidArgument(e.to_string()))?;
        validate_id("workspaceId", &workspace_id).map_err(|e| SupervisorError::InvalidArgument(e.to_string()))?;
        validate_id("projectId", &project_id).map_err(|e| SupervisorError::InvalidArgument(e.to_string()))?;
        if task.trim().is_empty() {
            return Err(SupervisorError::InvalidArgument("task must not be empty".into()));
        }

        let current_count = self.store.get_workspace_session_count(&workspace_id).await?;
        if current_count >= self.config.max_concurrent_sessions {
            return Err(SupervisorError::ConcurrencyExceeded(workspace_id));
        }

        let cwd = working_directory.unwrap_or_else(default_working_directory);
        let spawned = self
            .spawner
            .spawn(&task, &cwd)
            .await
            .map_err(|e| SupervisorError::SpawnFailed(e.to_string()))?;

        let session_id = SessionId::generate();
        let now = self.clock.now_ms();
        let session = Session {
            session_id: session_id.clone(),
            workspace_id: WorkspaceId::new(workspace_id.clone()),
            project_id: ProjectId::new(project_id),
            agent_id: AgentId::new(agent_id.clone()),
            pid: spawned.pid,
            status: SessionStatus::Running,
            task,
            started_at_ms: now,
            last_heartbeat_ms: now,
            terminated_at_ms: None,
        };
        self.store.store_session(&session).await?;

        let entry = Arc::new(SessionEntry {
            session: RwLock::new(session),
            control: spawned.control,
            stdin_tx: spawned.stdin_tx,
            line_counter: AtomicU64::new(0),
            ring: Mutex::new(RingBuffer::new(self.config.ring_buffer_capacity)),
            heartbeat_task: Mutex::new(None),
            exited: Arc::new(Notify::new()),
        });
        self.by_session
            .write()
            .insert(session_id.as_str().to_string(), entry.clone());
        self.by_agent
            .write()
            .insert(agent_id.clone(), session_id.as_str().to_string());

        self.start_heartbeat(session_id.clone(), entry.clone());
        self.start_output_readers(
            session_id.clone(),
            AgentId::new(agent_id.clone()),
            entry.clone(),
            spawned.stdout_rx,
            spawned.stderr_rx,
        );
        self.start_exit_watcher(session_id.clone(), AgentId::new(agent_id), entry.clone(), spawned.exit_rx);

        Ok(SessionHandle {
            session_id,
            agent_id: entry.session.read().agent_id.clone(),
            pid: entry.session.read().pid,
        })
    }

    pub fn get_session(&self, session_id: &str) -> Option<Session> {
        self.by_session
            .read()
            .get(session_id)
            .map(|e| e.session.read().clone())
    }

    pub fn get_session_by_agent(&self, agent_id: &str) -> Option<Session> {
        let session_id = self.by_agent.read().get(agent_id).cloned()?;
        self.get_session(&session_id)
    }

    pub fn get_all_sessions(&self) -> Vec<Session> {
        self.by_session
            .read()
            .values()
            .map(|e| e.session.read().clone())
            .collect()
    }

    pub async fn send_command(&self, session_id: &str, line: &str) -> Result<(), SupervisorError> {
        let entry = self
            .by_session
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SupervisorError::NotFound(session_id.to_string()))?;

        if entry.session.read().status != SessionStatus::Running {
            return Err(SupervisorError::NotRunning(session_id.to_string()));
        }

        entry
            .stdin_tx
            .send(line.to_string())
            .await
            .map_err(|_| SupervisorError::StdinClosed(session_id.to_string()))?;

        let line_number = entry.line_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let event = OutputEvent {
            session_id: SessionId::new(session_id),
            agent_id: entry.session.read().agent_id.clone(),
            event_type: OutputEventType::Command,
            content: line.to_string(),
            timestamp: self.clock.now_iso(),
            line_number,
        };
        entry.ring.lock().push(event.clone());
        let _ = self.notify_tx.send(SupervisorNotification::Output(event));
        Ok(())
    }

    /// Idempotent: unknown ids succeed silently.
    pub async fn terminate_session(&self, session_id: &str) -> Result<(), SupervisorError> {
        let entry = match self.by_session.read().get(session_id).cloned() {
            Some(e) => e,
            None => return Ok(()),
        };
        if entry.session.read().status == SessionStatus::Terminated {
            return Ok(());
        }

        entry.control.terminate().await?;
        let graceful = tokio::time::timeout(self.config.terminate_grace, entry.exited.notified()).await;
        if graceful.is_err() {
            warn!(session_id, "graceful terminate timed out, sending kill");
            entry.control.kill().await?;
            entry.exited.notified().await;
        }
        Ok(())
    }

    pub async fn terminate_all_sessions(&self) {
        let ids: Vec<String> = self.by_session.read().keys().cloned().collect();
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            let this = self.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = this.terminate_session(&id).await {
                    error!(session_id = %id, error = %e, "failed to terminate session");
                }
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }
    }

    fn start_heartbeat(&self, session_id: SessionId, entry: Arc<SessionEntry>) {
        let store = self.store.clone();
        let clock = self.clock.clone();
        let interval = self.config.heartbeat_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if entry.session.read().status != SessionStatus::Running {
                    break;
                }
                let now = clock.now_ms();
                entry.session.write().last_heartbeat_ms = now;
                if let Err(e) = store.update_heartbeat(session_id.as_str(), now).await {
                    // Heartbeat failures are logged, never fatal.
                    debug!(session_id = %session_id, error = %e, "heartbeat write failed");
                }
            }
        });
        *entry.heartbeat_task.lock() = Some(handle);
    }

    fn start_output_readers(
        &self,
        session_id: SessionId,
        agent_id: AgentId,
        entry: Arc<SessionEntry>,
        mut stdout_rx: tokio::sync::mpsc::Receiver<String>,
        mut stderr_rx: tokio::sync::mpsc::Receiver<String>,
    ) {
        let clock = self.clock.clone();
        let notify_tx = self.notify_tx.clone();
        let entry_out = entry.clone();
        let sid = session_id.clone();
        let aid = agent_id.clone();
        tokio::spawn(async move {
            while let Some(line) = stdout_rx.recv().await {
                emit_line(&entry_out, &sid, &aid, OutputEventType::Stdout, line, &clock, &notify_tx);
            }
        });
        let clock = self.clock.clone();
        let notify_tx = self.notify_tx.clone();
        tokio::spawn(async move {
            while let Some(line) = stderr_rx.recv().await {
                emit_line(&entry, &session_id, &agent_id, OutputEventType::Stderr, line, &clock, &notify_tx);
            }
        });
    }

    fn start_exit_watcher(
        &self,
        session_id: SessionId,
        agent_id: AgentId,
        entry: Arc<SessionEntry>,
        exit_rx: tokio::sync::oneshot::Receiver<crate::spawner::ExitStatus>,
    ) {
        let this = self.clone();
        tokio::spawn(async move {
            let status = exit_rx.await.unwrap_or(crate::spawner::ExitStatus {
                code: None,
                signal: None,
            });
            let line_number = entry.line_counter.fetch_add(1, Ordering::SeqCst) + 1;
            let content = format!(
                "Process exited with code {}, signal {}",
                status
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "null".to_string()),
                status
                    .signal
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "null".to_string()),
            );
            let event = OutputEvent {
                session_id: session_id.clone(),
                agent_id: agent_id.clone(),
                event_type: OutputEventType::Exit,
                content,
                timestamp: this.clock.now_iso(),
                line_number,
            };
            entry.ring.lock().push(event.clone());
            let _ = this.notify_tx.send(SupervisorNotification::Output(event));

            let now = this.clock.now_ms();
            entry.session.write().status = SessionStatus::Terminated;
            entry.session.write().terminated_at_ms = Some(now);
            if let Some(hb) = entry.heartbeat_task.lock().take() {
                hb.abort();
            }
            if let Err(e) = this
                .store
                .update_status(session_id.as_str(), SessionStatus::Terminated, Some(now))
                .await
            {
                debug!(session_id = %session_id, error = %e, "store update on exit failed");
            }

            let _ = this.notify_tx.send(SupervisorNotification::Terminated {
                session_id: session_id.clone(),
                agent_id: agent_id.clone(),
                code: status.code,
                signal: status.signal,
            });

            this.by_session.write().remove(session_id.as_str());
            this.by_agent.write().remove(agent_id.as_str());
            if let Err(e) = this.store.delete_session(session_id.as_str()).await {
                debug!(session_id = %session_id, error = %e, "store delete on exit failed");
            }
            info!(session_id = %session_id, "session terminated");
            entry.exited.notify_one();
        });
    }
}

fn emit_line(
    entry: &Arc<SessionEntry>,
    session_id: &SessionId,
    agent_id: &AgentId,
    kind: OutputEventType,
    content: String,
    clock: &Arc<dyn Clock>,
    notify_tx: &broadcast::Sender<SupervisorNotification>,
) {
    let line_number = entry.line_counter.fetch_add(1, Ordering::SeqCst) + 1;
    let event = OutputEvent {
        session_id: session_id.clone(),
        agent_id: agent_id.clone(),
        event_type: kind,
        content,
        timestamp: clock.now_iso(),
        line_number,
    };
    entry.ring.lock().push(event.clone());
    let _ = notify_tx.send(SupervisorNotification::Output(event));
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
