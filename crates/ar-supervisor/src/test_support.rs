// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Fake `Spawner` for tests (feature `test-support`): scripted
//! behavior, no real process.

use crate::error::SupervisorError;
use crate::spawner::{ExitStatus, ProcessControl, SpawnedChild, Spawner};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

pub struct FakeSpawner {
    pub next_pid: std::sync::atomic::AtomicU32,
}

impl Default for FakeSpawner {
    fn default() -> Self {
        Self {
            next_pid: std::sync::atomic::AtomicU32::new(1000),
        }
    }
}

/// Handle the test keeps to drive a spawned fake child's output and exit.
pub struct FakeChildHandle {
    pub stdout_tx: mpsc::Sender<String>,
    pub stderr_tx: mpsc::Sender<String>,
    pub exit_tx: oneshot::Sender<ExitStatus>,
    pub stdin_rx: mpsc::Receiver<String>,
    pub terminated: Arc<AtomicBool>,
    pub killed: Arc<AtomicBool>,
}

struct FakeControl {
    terminated: Arc<AtomicBool>,
    killed: Arc<AtomicBool>,
}

#[async_trait]
impl ProcessControl for FakeControl {
    async fn terminate(&self) -> Result<(), SupervisorError> {
        self.terminated.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn kill(&self) -> Result<(), SupervisorError> {
        self.killed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl FakeSpawner {
    /// Build a (SpawnedChild, FakeChildHandle) pair without going through
    /// the `Spawner` trait, for tests that want direct control.
    pub fn make_pair(pid: u32) -> (SpawnedChild, FakeChildHandle) {
        let (stdout_tx, stdout_rx) = mpsc::channel(64);
        let (stderr_tx, stderr_rx) = mpsc::channel(64);
        let (stdin_tx, stdin_rx) = mpsc::channel(64);
        let (exit_tx, exit_rx) = oneshot::channel();
        let terminated = Arc::new(AtomicBool::new(false));
        let killed = Arc::new(AtomicBool::new(false));
        let child = SpawnedChild {
            pid,
            stdout_rx,
            stderr_rx,
            stdin_tx,
            exit_rx,
            control: Arc::new(FakeControl {
                terminated: terminated.clone(),
                killed: killed.clone(),
            }),
        };
        let handle = FakeChildHandle {
            stdout_tx,
            stderr_tx,
            exit_tx,
            stdin_rx,
            terminated,
            killed,
        };
        (child, handle)
    }
}

#[async_trait]
impl Spawner for FakeSpawner {
    async fn spawn(
        &self,
        _task: &str,
        _working_directory: &std::path::Path,
    ) -> Result<SpawnedChild, SupervisorError> {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let (child, _handle) = Self::make_pair(pid);
        // Without a test driving `_handle`, the child simply has no output
        // and never exits until dropped. Tests needing scripted behavior
        // should use `make_pair` directly instead of going through `spawn`.
        Ok(child)
    }
}
