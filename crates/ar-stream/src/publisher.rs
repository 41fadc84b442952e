// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Stream Publisher: batches StreamEvents and publishes
//! them individually, with retry and timeout, to the pub/sub channel
//! keyed by workspace. Flushing is serialized by a single-flight mutex:
//! concurrent flush requests await the in-flight flush, and a follow-up
//! flush is scheduled if new events arrived while flushing.

use crate::metrics::{MetricsAccumulator, PublisherMetrics};
use ar_core::{Clock, StreamEvent};
use ar_store::keys::channel_name;
use ar_store::KeyValueStore;
use parking_lot::Mutex as SyncMutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub max_batch_size: usize,
    pub batch_window: Duration,
    pub retry_attempts: u32,
    pub retry_delay_base: Duration,
    pub publish_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 50,
            batch_window: Duration::from_millis(100),
            retry_attempts: 3,
            retry_delay_base: Duration::from_millis(100),
            publish_timeout: Duration::from_millis(500),
        }
    }
}

pub struct StreamPublisher {
    kv: Arc<dyn KeyValueStore>,
    config: PublisherConfig,
    clock: Arc<dyn Clock>,
    pending: Arc<SyncMutex<VecDeque<StreamEvent>>>,
    flush_lock: Arc<AsyncMutex<()>>,
    flush_again: Arc<AtomicBool>,
    timer_handle: Arc<SyncMutex<Option<JoinHandle<()>>>>,
    drained: Arc<AtomicBool>,
    metrics: Arc<SyncMutex<MetricsAccumulator>>,
}

impl StreamPublisher {
    pub fn new(kv: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, config: PublisherConfig) -> Self {
        Self {
            kv,
            config,
            clock,
            pending: Arc::new(SyncMutex::new(VecDeque::new())),
            flush_lock: Arc::new(AsyncMutex::new(())),
            flush_again: Arc::new(AtomicBool::new(false)),
            timer_handle: Arc::new(SyncMutex::new(None)),
            drained: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(SyncMutex::new(MetricsAccumulator::default())),
        }
    }

    pub fn metrics(&self) -> PublisherMetrics {
        self.metrics.lock().snapshot()
    }

    /// Enqueue a StreamEvent for batched publishing. Never blocks; flush
    /// failures never surface here.
    pub fn enqueue(&self, event: StreamEvent) {
        if self.drained.load(Ordering::SeqCst) {
            return;
        }
        let is_first = {
            let mut pending = self.pending.lock();
            pending.push_back(event);
            pending.len() == 1
        };
        let should_flush_now = {
            let pending = self.pending.lock();
            pending.len() >= self.config.max_batch_size
        };
        if should_flush_now {
            self.cancel_timer();
            self.spawn_flush();
        } else if is_first {
            self.start_batch_timer();
        }
    }

    fn start_batch_timer(&self) {
        let window = self.config.batch_window;
        let this = self.clone_handles();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            this.spawn_flush();
        });
        *self.timer_handle.lock() = Some(handle);
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.timer_handle.lock().take() {
            handle.abort();
        }
    }

    fn spawn_flush(&self) {
        let this = self.clone_handles();
        tokio::spawn(async move {
            this.flush().await;
        });
    }

    /// Flush pending events. Single-flight: if a flush is already in
    /// progress, this records that a follow-up is needed and returns
    /// without blocking the caller.
    pub async fn flush(&self) {
        let guard = match self.flush_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                self.flush_again.store(true, Ordering::SeqCst);
                return;
            }
        };
        self.flush_locked(guard).await;
    }

    /// Flush unconditionally, waiting for any in-flight flush first. Used
    /// by `shutdown` so the final drain is guaranteed to run.
    async fn flush_blocking(&self) {
        let guard = self.flush_lock.lock().await;
        self.flush_locked(guard).await;
    }

    async fn flush_locked(&self, _guard: tokio::sync::MutexGuard<'_, ()>) {
        loop {
            let batch: Vec<StreamEvent> = {
                let mut pending = self.pending.lock();
                pending.drain(..).collect()
            };
            if !batch.is_empty() {
                let batch_len = batch.len() as u64;
                for event in &batch {
                    self.publish_with_retry(event).await;
                }
                self.metrics
                    .lock()
                    .record_batch(batch_len, self.clock.now_ms());
            }
            if !self.flush_again.swap(false, Ordering::SeqCst) {
                break;
            }
            // New events arrived while we were flushing; drain again
            // before releasing the single-flight lock.
        }
    }

    async fn publish_with_retry(&self, event: &StreamEvent) {
        let channel = channel_name(event.workspace_id.as_str());
        let payload = match serde_json::to_string(event) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "failed to serialize StreamEvent, dropping");
                self.metrics.lock().record_publish_failure();
                return;
            }
        };

        for attempt in 0..self.config.retry_attempts {
            let started = self.clock.now_ms();
            let result = tokio::time::timeout(
                self.config.publish_timeout,
                self.kv.publish(&channel, &payload),
            )
            .await;
            match result {
                Ok(Ok(())) => {
                    let latency = (self.clock.now_ms() - started) as f64;
                    self.metrics.lock().record_publish_success(latency);
                    return;
                }
                Ok(Err(e)) => {
                    debug!(error = %e, attempt, "publish attempt failed");
                }
                Err(_) => {
                    debug!(attempt, "publish attempt timed out");
                }
            }
            let delay = self.config.retry_delay_base * 2u32.pow(attempt);
            tokio::time::sleep(delay).await;
        }
        warn!(session_id = %event.session_id, line_number = event.line_number, "publish exhausted retries, dropping event");
        self.metrics.lock().record_publish_failure();
    }

    /// Mark drained, cancel the pending batch timer, and perform one final
    /// flush. Subsequent enqueues are no-ops.
    pub async fn shutdown(&self) {
        self.drained.store(true, Ordering::SeqCst);
        self.cancel_timer();
        self.flush_blocking().await;
    }

    fn clone_handles(&self) -> Self {
        Self {
            kv: self.kv.clone(),
            config: self.config.clone(),
            clock: self.clock.clone(),
            pending: self.pending.clone(),
            flush_lock: self.flush_lock.clone(),
            flush_again: self.flush_again.clone(),
            timer_handle: self.timer_handle.clone(),
            drained: self.drained.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
