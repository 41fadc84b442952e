// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Process spawning abstraction. Real sessions go through `TokioSpawner`
//! (spawn name `claude`, args `["--print", <task>]`, piped
//! stdio, `TERM=xterm-256color`); tests substitute `FakeSpawner`.

use crate::error::SupervisorError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

/// Lines read from stdout/stderr, the write side of stdin, and the exit
/// notification for a spawned child. Lines are pre-split on `\n` with a
/// trailing `\r` stripped, so callers never see CR/LF split surprises.
pub struct SpawnedChild {
    pub pid: u32,
    pub stdout_rx: mpsc::Receiver<String>,
    pub stderr_rx: mpsc::Receiver<String>,
    pub stdin_tx: mpsc::Sender<String>,
    pub exit_rx: oneshot::Receiver<ExitStatus>,
    pub control: std::sync::Arc<dyn ProcessControl>,
}

#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Ask the process to exit gracefully (SIGTERM on Unix).
    async fn terminate(&self) -> Result<(), SupervisorError>;
    /// Force the process to exit immediately (SIGKILL on Unix).
    async fn kill(&self) -> Result<(), SupervisorError>;
}

#[async_trait]
pub trait Spawner: Send + Sync {
    async fn spawn(
        &self,
        task: &str,
        working_directory: &std::path::Path,
    ) -> Result<SpawnedChild, SupervisorError>;
}

pub struct TokioSpawner;

struct PidControl {
    pid: i32,
}

#[async_trait]
impl ProcessControl for PidControl {
    #[cfg(unix)]
    async fn terminate(&self) -> Result<(), SupervisorError> {
        // SAFETY: kill(2) with a pid we own and a standard signal number.
        let rc = unsafe { libc::kill(self.pid, libc::SIGTERM) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(SupervisorError::Crashed(format!(
                    "SIGTERM failed for pid {}: {err}",
                    self.pid
                )));
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    async fn kill(&self) -> Result<(), SupervisorError> {
        // SAFETY: kill(2) with a pid we own and a standard signal number.
        let rc = unsafe { libc::kill(self.pid, libc::SIGKILL) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(SupervisorError::Crashed(format!(
                    "SIGKILL failed for pid {}: {err}",
                    self.pid
                )));
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn terminate(&self) -> Result<(), SupervisorError> {
        Ok(())
    }

    #[cfg(not(unix))]
    async fn kill(&self) -> Result<(), SupervisorError> {
        Ok(())
    }
}

#[async_trait]
impl Spawner for TokioSpawner {
    async fn spawn(
        &self,
        task: &str,
        working_directory: &std::path::Path,
    ) -> Result<SpawnedChild, SupervisorError> {
        let mut cmd = Command::new("claude");
        cmd.arg("--print")
            .arg(task)
            .current_dir(working_directory)
            .env("TERM", "xterm-256color")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| SupervisorError::SpawnFailed(e.to_string()))?;

        let pid = child
            .id()
            .ok_or_else(|| SupervisorError::SpawnFailed("child exited before pid available".into()))?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SupervisorError::SpawnFailed("missing stdout pipe".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| SupervisorError::SpawnFailed("missing stderr pipe".into()))?;

        let (stdout_tx, stdout_rx) = mpsc::channel::<String>(256);
        let (stderr_tx, stderr_rx) = mpsc::channel::<String>(256);
        let (stdin_tx, mut stdin_rx) = mpsc::channel::<String>(256);
        let (exit_tx, exit_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if stdout_tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if stderr_tx.send(line).await.is_err() {
                    break;
                }
            }
        });
        if let Some(mut stdin) = stdin {
            tokio::spawn(async move {
                while let Some(line) = stdin_rx.recv().await {
                    if stdin.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                    if stdin.write_all(b"\n").await.is_err() {
                        break;
                    }
                }
            });
        }
        tokio::spawn(async move {
            let status = child.wait().await;
            let exit = match status {
                Ok(status) => ExitStatus {
                    code: status.code(),
                    signal: unix_signal(&status),
                },
                Err(_) => ExitStatus {
                    code: None,
                    signal: None,
                },
            };
            let _ = exit_tx.send(exit);
        });

        Ok(SpawnedChild {
            pid,
            stdout_rx,
            stderr_rx,
            stdin_tx,
            exit_rx,
            control: std::sync::Arc::new(PidControl { pid: pid as i32 }),
        })
    }
}

#[cfg(unix)]
fn unix_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn unix_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

/// Directory a session spawns into when the caller doesn't specify one.
pub fn default_working_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
