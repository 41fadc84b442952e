// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy. Each crate may wrap `CoreError`
//! in a crate-local error enum but never invents variants outside this
//! taxonomy for errors that cross a crate boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("concurrency exceeded for workspace {0}")]
    ConcurrencyExceeded(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not running: {0}")]
    NotRunning(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("stdin closed: {0}")]
    StdinClosed(String),
    #[error("crashed: {0}")]
    Crashed(String),
    #[error("store error: {0}")]
    StoreError(String),
    #[error("publish timed out: {0}")]
    PublishTimeout(String),
    #[error("routing failed: {0}")]
    RoutingFailure(String),
}
