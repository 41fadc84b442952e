// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful-shutdown trigger: SIGTERM/SIGINT both initiate
//! the same cascade.

use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

/// Resolves once either signal fires, logging which one.
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => info!("received SIGINT, shutting down"),
    }
    Ok(())
}
