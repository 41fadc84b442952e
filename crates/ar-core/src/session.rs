// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session record.

use crate::id::{AgentId, ProjectId, SessionId, WorkspaceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Terminated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub agent_id: AgentId,
    pub pid: u32,
    pub status: SessionStatus,
    pub task: String,
    pub started_at_ms: i64,
    pub last_heartbeat_ms: i64,
    pub terminated_at_ms: Option<i64>,
}

impl Session {
    /// Invariant: `terminated_at_ms` is set iff status is Terminated.
    pub fn invariant_holds(&self) -> bool {
        matches!(self.status, SessionStatus::Terminated) == self.terminated_at_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            session_id: SessionId::new("s1"),
            workspace_id: WorkspaceId::new("ws-1"),
            project_id: ProjectId::new("prj-1"),
            agent_id: AgentId::new("agent-1"),
            pid: 1234,
            status: SessionStatus::Running,
            task: "do x".to_string(),
            started_at_ms: 0,
            last_heartbeat_ms: 0,
            terminated_at_ms: None,
        }
    }

    #[test]
    fn invariant_holds_for_running_without_terminated_at() {
        assert!(sample().invariant_holds());
    }

    #[test]
    fn invariant_violated_if_terminated_without_timestamp() {
        let mut s = sample();
        s.status = SessionStatus::Terminated;
        assert!(!s.invariant_holds());
        s.terminated_at_ms = Some(100);
        assert!(s.invariant_holds());
    }
}
