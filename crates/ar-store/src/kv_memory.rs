// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-process `KeyValueStore` used by tests and single-node deployments
//! that don't want an external Redis. TTLs are tracked but only enforced
//! lazily (on read), favoring simple, explainable state over background
//! reaper tasks.

use crate::error::StoreError;
use crate::kv::{KeyValueStore, SCAN_PAGE_SIZE};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

#[derive(Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
    Set(std::collections::HashSet<String>),
    List(VecDeque<String>),
}

struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<HashMap<String, Entry>>,
    published: Mutex<Vec<(String, String)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: messages published via `publish`, in order.
    pub fn published_messages(&self) -> Vec<(String, String)> {
        self.published.lock().clone()
    }

    fn is_live(entry: &Entry) -> bool {
        match entry.expires_at {
            Some(at) => Instant::now() < at,
            None => true,
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self.data.lock();
        match data.get(key) {
            Some(entry) if Self::is_live(entry) => match &entry.value {
                Value::Str(s) => Ok(Some(s.clone())),
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        data.insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.data.lock().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let data = self.data.lock();
        Ok(data.get(key).map(Self::is_live).unwrap_or(false))
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        if let Some(entry) = self.data.lock().get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let data = self.data.lock();
        match data.get(key) {
            Some(entry) if Self::is_live(entry) => match &entry.value {
                Value::Hash(h) => Ok(h.clone()),
                _ => Ok(HashMap::new()),
            },
            _ => Ok(HashMap::new()),
        }
    }

    async fn hash_set_all(
        &self,
        key: &str,
        fields: HashMap<String, String>,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        data.insert(
            key.to_string(),
            Entry {
                value: Value::Hash(fields),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn hash_set_fields(
        &self,
        key: &str,
        fields: HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        let entry = data.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Hash(HashMap::new()),
            expires_at: None,
        });
        if let Value::Hash(h) = &mut entry.value {
            h.extend(fields);
        } else {
            entry.value = Value::Hash(fields);
        }
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        let entry = data.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::Set(Default::default()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::Set(s) => {
                s.insert(member.to_string());
            }
            _ => {
                let mut s = std::collections::HashSet::new();
                s.insert(member.to_string());
                entry.value = Value::Set(s);
            }
        }
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        if let Some(entry) = data.get_mut(key) {
            if let Value::Set(s) = &mut entry.value {
                s.remove(member);
            }
        }
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock();
        match data.get(key) {
            Some(entry) if Self::is_live(entry) => match &entry.value {
                Value::Set(s) => Ok(s.iter().cloned().collect()),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    async fn set_card(&self, key: &str) -> Result<usize, StoreError> {
        Ok(self.set_members(key).await?.len())
    }

    async fn list_push_front(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        let entry = data.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(VecDeque::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::List(l) => l.push_front(value.to_string()),
            _ => {
                let mut l = VecDeque::new();
                l.push_front(value.to_string());
                entry.value = Value::List(l);
            }
        }
        Ok(())
    }

    async fn list_trim(&self, key: &str, max_len: usize) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        if let Some(entry) = data.get_mut(key) {
            if let Value::List(l) = &mut entry.value {
                l.truncate(max_len);
            }
        }
        Ok(())
    }

    async fn list_range(
        &self,
        key: &str,
        start: usize,
        count: usize,
    ) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock();
        match data.get(key) {
            Some(entry) if Self::is_live(entry) => match &entry.value {
                Value::List(l) => Ok(l.iter().skip(start).take(count).cloned().collect()),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    async fn list_len(&self, key: &str) -> Result<usize, StoreError> {
        let data = self.data.lock();
        match data.get(key) {
            Some(entry) if Self::is_live(entry) => match &entry.value {
                Value::List(l) => Ok(l.len()),
                _ => Ok(0),
            },
            _ => Ok(0),
        }
    }

    async fn scan_keys(&self, prefix: &str, max_results: usize) -> Result<Vec<String>, StoreError> {
        let data = self.data.lock();
        let mut out = Vec::new();
        let mut page = Vec::with_capacity(SCAN_PAGE_SIZE);
        for (key, entry) in data.iter() {
            if !Self::is_live(entry) || !key.starts_with(prefix) {
                continue;
            }
            page.push(key.clone());
            if page.len() == SCAN_PAGE_SIZE {
                out.extend(page.drain(..));
                if out.len() >= max_results {
                    break;
                }
            }
        }
        out.extend(page);
        out.truncate(max_results);
        Ok(out)
    }

    async fn publish(&self, channel: &str, message: &str) -> Result<(), StoreError> {
        self.published
            .lock()
            .push((channel.to_string(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_roundtrip() {
        let store = InMemoryStore::new();
        store.set_string("k", "v", None).await.unwrap();
        assert_eq!(store.get_string("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn ttl_expires_lazily() {
        let store = InMemoryStore::new();
        store
            .set_string("k", "v", Some(Duration::from_millis(1)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get_string("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_push_front_and_trim() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .list_push_front("h", &i.to_string())
                .await
                .unwrap();
        }
        store.list_trim("h", 3).await.unwrap();
        assert_eq!(store.list_len("h").await.unwrap(), 3);
        // newest (4) is at the front
        let range = store.list_range("h", 0, 10).await.unwrap();
        assert_eq!(range, vec!["4", "3", "2"]);
    }

    #[tokio::test]
    async fn set_membership() {
        let store = InMemoryStore::new();
        store.set_add("s", "a").await.unwrap();
        store.set_add("s", "b").await.unwrap();
        assert_eq!(store.set_card("s").await.unwrap(), 2);
        store.set_remove("s", "a").await.unwrap();
        assert_eq!(store.set_members("s").await.unwrap(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn publish_records_messages() {
        let store = InMemoryStore::new();
        store.publish("chan", "msg").await.unwrap();
        assert_eq!(
            store.published_messages(),
            vec![("chan".to_string(), "msg".to_string())]
        );
    }
}
