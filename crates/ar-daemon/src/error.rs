// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! DaemonError — the startup/wiring-facing slice of the shared error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("store error: {0}")]
    Store(#[from] ar_store::StoreError),
    #[error("signal handler setup failed: {0}")]
    Signal(#[from] std::io::Error),
}
