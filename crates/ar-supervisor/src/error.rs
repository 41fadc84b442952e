// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SupervisorError — the Supervisor-facing slice of the shared error taxonomy.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum SupervisorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("concurrency exceeded for workspace {0}")]
    ConcurrencyExceeded(String),
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("session not running: {0}")]
    NotRunning(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("stdin closed for session {0}")]
    StdinClosed(String),
    #[error("process crashed: {0}")]
    Crashed(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<ar_store::StoreError> for SupervisorError {
    fn from(e: ar_store::StoreError) -> Self {
        SupervisorError::Store(e.to_string())
    }
}
