// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration (with documented defaults).

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub max_concurrent_sessions: usize,
    pub heartbeat_interval: Duration,
    pub terminate_grace: Duration,
    pub ring_buffer_capacity: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: 10,
            heartbeat_interval: Duration::from_secs(30),
            terminate_grace: Duration::from_secs(5),
            ring_buffer_capacity: 1_000,
        }
    }
}
