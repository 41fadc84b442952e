// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed fan-out notifications from the Supervisor: the Publisher and
//! Health Monitor subscribe to these without any coupling to how
//! sessions are implemented.

use ar_core::{AgentId, OutputEvent, SessionId};

#[derive(Debug, Clone)]
pub enum SupervisorNotification {
    Output(OutputEvent),
    Crashed {
        session_id: SessionId,
        agent_id: AgentId,
        message: String,
    },
    Terminated {
        session_id: SessionId,
        agent_id: AgentId,
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// A session's heartbeat went stale and the Health Monitor reclaimed it.
    /// Distinct from `Crashed`: no process-exit signal was ever observed,
    /// just the absence of a heartbeat for longer than the stale threshold.
    SessionStale {
        session_id: SessionId,
        agent_id: AgentId,
        last_heartbeat_ms: i64,
    },
    /// Snapshot published at the end of every Health Monitor sweep.
    HealthCheckComplete {
        total: usize,
        active: usize,
        stale: usize,
        terminated: usize,
        memory_kb: Option<u64>,
        timestamp: String,
    },
}

/// Broadcast capacity for the Supervisor's notification channel. Generous
/// enough that a slow subscriber lags rather than the Supervisor blocking.
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 4096;
