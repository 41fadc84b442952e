// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Model Catalog Client: a cached, read-only HTTP client
//! against the external model-registry service.

use crate::cache::TtlCache;
use crate::error::CatalogError;
use ar_core::model::QualityTier;
use ar_core::{Clock, Model, TaskType};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CACHE_CAPACITY: usize = 100;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub provider: Option<String>,
    pub quality_tier: Option<QualityTier>,
    pub task_type: Option<TaskType>,
    pub available: Option<bool>,
    pub supports_tools: Option<bool>,
    pub supports_vision: Option<bool>,
    pub supports_embedding: Option<bool>,
}

impl ModelFilter {
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(p) = &self.provider {
            params.push(("provider", p.clone()));
        }
        if let Some(q) = self.quality_tier {
            params.push(("qualityTier", format!("{q:?}").to_lowercase()));
        }
        if let Some(t) = self.task_type {
            params.push(("taskType", t.as_str().to_string()));
        }
        if let Some(a) = self.available {
            params.push(("available", a.to_string()));
        }
        if let Some(v) = self.supports_tools {
            params.push(("supportsTools", v.to_string()));
        }
        if let Some(v) = self.supports_vision {
            params.push(("supportsVision", v.to_string()));
        }
        if let Some(v) = self.supports_embedding {
            params.push(("supportsEmbedding", v.to_string()));
        }
        params
    }
}

#[derive(Deserialize)]
struct ModelsResponse {
    models: Vec<Model>,
}

pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    list_cache: TtlCache<Vec<Model>>,
    single_cache: TtlCache<Option<Model>>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, auth_token: Option<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            auth_token,
            list_cache: TtlCache::new(clock.clone(), DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL),
            single_cache: TtlCache::new(clock, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL),
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn list_models(&self, filter: &ModelFilter) -> Result<Vec<Model>, CatalogError> {
        let url = format!("{}/api/model-registry/models", self.base_url);
        let params = filter.query_params();
        let cache_key = format!("{url}?{params:?}");

        if let Some(cached) = self.list_cache.get(&cache_key) {
            debug!(cache_key, "catalog list cache hit");
            return Ok(cached);
        }

        let resp = self
            .authed(self.client.get(&url).query(&params))
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::BadStatus { status: status.as_u16(), body });
        }

        let parsed: ModelsResponse = resp
            .json()
            .await
            .map_err(|e| CatalogError::Request(format!("malformed response: {e}")))?;
        self.list_cache.put(cache_key, parsed.models.clone());
        Ok(parsed.models)
    }

    /// 404 is a legitimate null, not an error.
    pub async fn get_model(&self, model_id: &str) -> Result<Option<Model>, CatalogError> {
        let url = format!("{}/api/model-registry/models/{model_id}", self.base_url);
        if let Some(cached) = self.single_cache.get(&url) {
            return Ok(cached);
        }

        let resp = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        if resp.status().as_u16() == 404 {
            self.single_cache.put(url, None);
            return Ok(None);
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::BadStatus { status: status.as_u16(), body });
        }

        let model: Model = resp
            .json()
            .await
            .map_err(|e| CatalogError::Request(format!("malformed response: {e}")))?;
        self.single_cache.put(url, Some(model.clone()));
        Ok(Some(model))
    }

    pub async fn models_for_provider(&self, provider: &str) -> Result<Vec<Model>, CatalogError> {
        let url = format!("{}/api/model-registry/models/provider/{provider}", self.base_url);
        if let Some(cached) = self.list_cache.get(&url) {
            return Ok(cached);
        }
        let resp = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::BadStatus { status: status.as_u16(), body });
        }
        let parsed: ModelsResponse = resp
            .json()
            .await
            .map_err(|e| CatalogError::Request(format!("malformed response: {e}")))?;
        self.list_cache.put(url, parsed.models.clone());
        Ok(parsed.models)
    }

    pub async fn models_for_task(&self, task_type: TaskType) -> Result<Vec<Model>, CatalogError> {
        let url = format!("{}/api/model-registry/models/task/{}", self.base_url, task_type.as_str());
        if let Some(cached) = self.list_cache.get(&url) {
            return Ok(cached);
        }
        let resp = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::BadStatus { status: status.as_u16(), body });
        }
        let parsed: ModelsResponse = resp
            .json()
            .await
            .map_err(|e| CatalogError::Request(format!("malformed response: {e}")))?;
        self.list_cache.put(url, parsed.models.clone());
        Ok(parsed.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_only_include_set_fields() {
        let filter = ModelFilter {
            provider: Some("anthropic".into()),
            ..Default::default()
        };
        let params = filter.query_params();
        assert_eq!(params, vec![("provider", "anthropic".to_string())]);
    }

    #[test]
    fn empty_filter_produces_no_params() {
        assert!(ModelFilter::default().query_params().is_empty());
    }
}
