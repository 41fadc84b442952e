// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session Store: a durable-ish cross-replica index keyed
//! by the shared key-value store, built on three reserved key families.

use crate::error::StoreError;
use crate::keys;
use crate::kv::KeyValueStore;
use ar_core::{AgentId, ProjectId, Session, SessionId, SessionStatus, WorkspaceId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// TTL on session records, refreshed on every heartbeat.
pub const SESSION_TTL: Duration = Duration::from_secs(86_400);

/// Hard cap on `get_all_session_ids` traversal.
pub const MAX_SCAN_RESULTS: usize = 10_000;

pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn store_session(&self, session: &Session) -> Result<(), StoreError> {
        let fields = session_to_fields(session);
        self.kv
            .hash_set_all(&keys::session_key(session.session_id.as_str()), fields, Some(SESSION_TTL))
            .await?;
        self.kv
            .set_add(
                &keys::workspace_sessions_key(session.workspace_id.as_str()),
                session.session_id.as_str(),
            )
            .await?;
        self.kv
            .set_string(
                &keys::agent_pointer_key(session.agent_id.as_str()),
                session.session_id.as_str(),
                Some(SESSION_TTL),
            )
            .await?;
        Ok(())
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let fields = self.kv.hash_get_all(&keys::session_key(session_id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        fields_to_session(session_id, &fields).map(Some)
    }

    /// Best-effort delete: reads metadata first so the workspace/agent
    /// indexes can be cleaned up. A later Health Monitor sweep reconciles
    /// anything this misses.
    pub async fn delete_session(&self, session_id: &str) -> Result<(), StoreError> {
        if let Some(session) = self.get_session(session_id).await? {
            self.kv
                .set_remove(
                    &keys::workspace_sessions_key(session.workspace_id.as_str()),
                    session_id,
                )
                .await?;
            // Only clear the agent pointer if it still points at this session.
            let pointer = self
                .kv
                .get_string(&keys::agent_pointer_key(session.agent_id.as_str()))
                .await?;
            if pointer.as_deref() == Some(session_id) {
                self.kv
                    .delete(&keys::agent_pointer_key(session.agent_id.as_str()))
                    .await?;
            }
        }
        self.kv.delete(&keys::session_key(session_id)).await?;
        Ok(())
    }

    pub async fn update_heartbeat(&self, session_id: &str, now_ms: i64) -> Result<(), StoreError> {
        let mut fields = HashMap::new();
        fields.insert("lastHeartbeat".to_string(), now_ms.to_string());
        self.kv
            .hash_set_fields(&keys::session_key(session_id), fields)
            .await?;
        self.kv
            .expire(&keys::session_key(session_id), SESSION_TTL)
            .await?;
        Ok(())
    }

    pub async fn update_status(
        &self,
        session_id: &str,
        status: SessionStatus,
        terminated_at_ms: Option<i64>,
    ) -> Result<(), StoreError> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_string());
        if status == SessionStatus::Terminated {
            if let Some(ts) = terminated_at_ms {
                fields.insert("terminatedAt".to_string(), ts.to_string());
            }
        }
        self.kv
            .hash_set_fields(&keys::session_key(session_id), fields)
            .await
    }

    pub async fn get_workspace_sessions(&self, workspace_id: &str) -> Result<Vec<String>, StoreError> {
        self.kv
            .set_members(&keys::workspace_sessions_key(workspace_id))
            .await
    }

    pub async fn get_workspace_session_count(&self, workspace_id: &str) -> Result<usize, StoreError> {
        self.kv
            .set_card(&keys::workspace_sessions_key(workspace_id))
            .await
    }

    pub async fn get_session_by_agent(&self, agent_id: &str) -> Result<Option<Session>, StoreError> {
        match self.kv.get_string(&keys::agent_pointer_key(agent_id)).await? {
            Some(session_id) => self.get_session(&session_id).await,
            None => Ok(None),
        }
    }

    pub async fn session_exists(&self, session_id: &str) -> Result<bool, StoreError> {
        self.kv.exists(&keys::session_key(session_id)).await
    }

    pub async fn get_all_session_ids(&self, max_results: usize) -> Result<Vec<String>, StoreError> {
        let cap = max_results.min(MAX_SCAN_RESULTS);
        let keys = self.kv.scan_keys("cli:session:", cap).await?;
        Ok(keys
            .into_iter()
            .map(|k| k.trim_start_matches("cli:session:").to_string())
            .collect())
    }
}

fn session_to_fields(session: &Session) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    fields.insert("sessionId".to_string(), session.session_id.to_string());
    fields.insert("workspaceId".to_string(), session.workspace_id.to_string());
    fields.insert("projectId".to_string(), session.project_id.to_string());
    fields.insert("agentId".to_string(), session.agent_id.to_string());
    fields.insert("pid".to_string(), session.pid.to_string());
    fields.insert("status".to_string(), session.status.as_str().to_string());
    fields.insert("task".to_string(), session.task.clone());
    fields.insert("startedAt".to_string(), session.started_at_ms.to_string());
    fields.insert(
        "lastHeartbeat".to_string(),
        session.last_heartbeat_ms.to_string(),
    );
    if let Some(ts) = session.terminated_at_ms {
        fields.insert("terminatedAt".to_string(), ts.to_string());
    }
    fields
}

fn fields_to_session(
    session_id: &str,
    fields: &HashMap<String, String>,
) -> Result<Session, StoreError> {
    let get = |k: &str| {
        fields
            .get(k)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("field {k} missing for {session_id}")))
    };
    let parse_i64 = |k: &str| -> Result<i64, StoreError> {
        get(k)?
            .parse()
            .map_err(|_| StoreError::Backend(format!("field {k} is not an integer")))
    };
    let status = match get("status")?.as_str() {
        "idle" => SessionStatus::Idle,
        "running" => SessionStatus::Running,
        "terminated" => SessionStatus::Terminated,
        other => return Err(StoreError::Backend(format!("unknown status: {other}"))),
    };
    Ok(Session {
        session_id: SessionId::new(session_id),
        workspace_id: WorkspaceId::new(get("workspaceId")?),
        project_id: ProjectId::new(get("projectId")?),
        agent_id: AgentId::new(get("agentId")?),
        pid: get("pid")?
            .parse()
            .map_err(|_| StoreError::Backend("pid is not an integer".to_string()))?,
        status,
        task: get("task")?,
        started_at_ms: parse_i64("startedAt")?,
        last_heartbeat_ms: parse_i64("lastHeartbeat")?,
        terminated_at_ms: fields.get("terminatedAt").and_then(|s| s.parse().ok()),
    })
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
