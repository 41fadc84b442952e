// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! History Buffer: a bounded per-session ring of
//! StreamEvent JSON lines kept in the shared store for replay to late
//! joiners. Insertion order is newest-first; reads return chronological
//! (oldest-first) order.

use crate::error::StoreError;
use crate::keys;
use crate::kv::KeyValueStore;
use ar_core::StreamEvent;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MAX_LINES: usize = 1_000;
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

pub struct HistoryBuffer {
    kv: Arc<dyn KeyValueStore>,
    max_lines: usize,
    ttl: Duration,
}

impl HistoryBuffer {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            max_lines: DEFAULT_MAX_LINES,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_limits(kv: Arc<dyn KeyValueStore>, max_lines: usize, ttl: Duration) -> Self {
        Self { kv, max_lines, ttl }
    }

    pub async fn append(&self, session_id: &str, event: &StreamEvent) -> Result<(), StoreError> {
        let key = keys::history_key(session_id);
        let payload = serde_json::to_string(event)?;
        self.kv.list_push_front(&key, &payload).await?;
        self.kv.list_trim(&key, self.max_lines).await?;
        self.kv.expire(&key, self.ttl).await?;
        Ok(())
    }

    /// Returns up to `count` events in chronological (oldest-first) order.
    /// Surfaces store errors; unreadable entries are skipped with a log.
    pub async fn read(&self, session_id: &str, count: Option<usize>) -> Result<Vec<StreamEvent>, StoreError> {
        let key = keys::history_key(session_id);
        let n = count.unwrap_or(self.max_lines);
        let raw = self.kv.list_range(&key, 0, n).await?;
        let mut events: Vec<StreamEvent> = Vec::with_capacity(raw.len());
        for line in raw.iter().rev() {
            match serde_json::from_str::<StreamEvent>(line) {
                Ok(ev) => events.push(ev),
                Err(e) => warn!(error = %e, "skipping unreadable history entry"),
            }
        }
        Ok(events)
    }

    /// Same as `read` but swallows all errors, returning an empty list
    /// instead of propagating a store failure.
    pub async fn read_safe(&self, session_id: &str, count: Option<usize>) -> Vec<StreamEvent> {
        self.read(session_id, count).await.unwrap_or_default()
    }

    pub async fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        self.kv.delete(&keys::history_key(session_id)).await
    }

    pub async fn len(&self, session_id: &str) -> Result<usize, StoreError> {
        self.kv.list_len(&keys::history_key(session_id)).await
    }

    pub async fn is_empty(&self, session_id: &str) -> Result<bool, StoreError> {
        Ok(self.len(session_id).await? == 0)
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
