// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The shared key-value store abstraction. Mirrors the primitives a Redis
//! deployment would offer: strings, hashes, sets, lists, TTL,
//! and a bounded iterative scan. Implementations: `InMemoryStore` (tests,
//! single-process deployments) and `RedisStore` (production).

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Page size for `scan_keys` iteration: iterative with a
/// per-iteration page size of 100.
pub const SCAN_PAGE_SIZE: usize = 100;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    // -- strings --
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    // -- hashes (field maps) --
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;
    async fn hash_set_all(
        &self,
        key: &str,
        fields: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError>;
    async fn hash_set_fields(
        &self,
        key: &str,
        fields: HashMap<String, String>,
    ) -> Result<(), StoreError>;

    // -- sets --
    async fn set_add(&self, key: &str, member: &str) -> Result<(), StoreError>;
    async fn set_remove(&self, key: &str, member: &str) -> Result<(), StoreError>;
    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;
    async fn set_card(&self, key: &str) -> Result<usize, StoreError>;

    // -- lists (used by the History Buffer; newest pushed to the front) --
    async fn list_push_front(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn list_trim(&self, key: &str, max_len: usize) -> Result<(), StoreError>;
    async fn list_range(
        &self,
        key: &str,
        start: usize,
        count: usize,
    ) -> Result<Vec<String>, StoreError>;
    async fn list_len(&self, key: &str) -> Result<usize, StoreError>;

    // -- scan --
    /// Iteratively enumerate keys matching `prefix`, paging `SCAN_PAGE_SIZE`
    /// at a time, stopping after `max_results`.
    async fn scan_keys(&self, prefix: &str, max_results: usize) -> Result<Vec<String>, StoreError>;

    // -- pub/sub --
    async fn publish(&self, channel: &str, message: &str) -> Result<(), StoreError>;
}
