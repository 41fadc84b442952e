// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Base policy shared by every vendor: validation, timeout,
//! retry, cost, and latency are implemented once here; vendor adapters only
//! translate wire formats.

use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse, HealthStatus, RateLimitStatus, StreamChunk, TokenUsage};
use ar_core::model::ModelPricing;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ProviderPolicyConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for ProviderPolicyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

/// Vendor-specific translation layer. Every method speaks the unified
/// request/response form; wire-format details stay inside the impl.
#[async_trait]
pub trait VendorAdapter: Send + Sync {
    fn provider_id(&self) -> &str;
    fn supports_model(&self, model_id: &str) -> bool;
    fn model_pricing(&self, model_id: &str) -> Option<ModelPricing>;
    fn supports_embedding(&self) -> bool;

    async fn do_complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<CompletionResponse, ProviderError>;

    async fn do_stream(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<mpsc::Receiver<StreamChunk>, ProviderError>;

    async fn do_embed(&self, text: &str, model: &str, api_key: &str) -> Result<Vec<f32>, ProviderError>;

    async fn do_health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError>;
}

/// Unified Provider façade over one `VendorAdapter`,
/// wrapping it in validation, timeout, retry, and cost accounting.
#[async_trait]
pub trait Provider: Send + Sync {
    fn provider_id(&self) -> &str;
    fn supports_model(&self, model_id: &str) -> bool;
    fn get_model_pricing(&self, model_id: &str) -> Option<ModelPricing>;
    async fn complete(&self, request: CompletionRequest, api_key: &str) -> Result<CompletionResponse, ProviderError>;
    async fn stream(&self, request: CompletionRequest, api_key: &str) -> Result<mpsc::Receiver<StreamChunk>, ProviderError>;
    async fn embed(&self, text: &str, model: &str, api_key: &str) -> Result<Vec<f32>, ProviderError>;
    async fn health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError>;
    fn calculate_cost(&self, model_id: &str, usage: &TokenUsage) -> f64;
    fn get_rate_limit_status(&self) -> RateLimitStatus;
}

pub struct BaseProvider<A: VendorAdapter> {
    adapter: A,
    config: ProviderPolicyConfig,
    rate_limit: Mutex<RateLimitStatus>,
}

impl<A: VendorAdapter> BaseProvider<A> {
    pub fn new(adapter: A, config: ProviderPolicyConfig) -> Self {
        Self {
            adapter,
            config,
            rate_limit: Mutex::new(RateLimitStatus::default()),
        }
    }

    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "{} call exceeded {:?}",
                self.adapter.provider_id(),
                self.config.timeout
            ))),
        }
    }
}

#[async_trait]
impl<A: VendorAdapter> Provider for BaseProvider<A> {
    fn provider_id(&self) -> &str {
        self.adapter.provider_id()
    }

    fn supports_model(&self, model_id: &str) -> bool {
        self.adapter.supports_model(model_id)
    }

    fn get_model_pricing(&self, model_id: &str) -> Option<ModelPricing> {
        self.adapter.model_pricing(model_id)
    }

    async fn complete(&self, request: CompletionRequest, api_key: &str) -> Result<CompletionResponse, ProviderError> {
        request.validate()?;
        if request.stream {
            return Err(ProviderError::InvalidRequest(
                "use stream() for streaming completions".into(),
            ));
        }

        let started = Instant::now();
        let mut attempt = 0u32;
        loop {
            let result = self.with_timeout(self.adapter.do_complete(&request, api_key)).await;
            match result {
                Ok(mut response) => {
                    response.latency = started.elapsed();
                    return Ok(response);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = err
                        .retry_after_ms()
                        .unwrap_or_else(|| self.config.retry_delay_ms * 2u64.pow(attempt));
                    warn!(
                        provider = self.adapter.provider_id(),
                        attempt,
                        delay_ms = delay,
                        error = %err,
                        "retrying provider call"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn stream(&self, request: CompletionRequest, api_key: &str) -> Result<mpsc::Receiver<StreamChunk>, ProviderError> {
        request.validate()?;
        // Streaming operations never retry: a partial stream cannot be
        // safely reissued.
        self.with_timeout(self.adapter.do_stream(&request, api_key)).await
    }

    async fn embed(&self, text: &str, model: &str, api_key: &str) -> Result<Vec<f32>, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("text must not be empty".into()));
        }
        if model.trim().is_empty() {
            return Err(ProviderError::InvalidRequest("model must not be empty".into()));
        }
        if !self.adapter.supports_embedding() {
            return Err(ProviderError::InvalidRequest(format!(
                "{} does not offer embeddings",
                self.adapter.provider_id()
            )));
        }

        let mut attempt = 0u32;
        loop {
            let result = self.with_timeout(self.adapter.do_embed(text, model, api_key)).await;
            match result {
                Ok(vector) => return Ok(vector),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = err
                        .retry_after_ms()
                        .unwrap_or_else(|| self.config.retry_delay_ms * 2u64.pow(attempt));
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError> {
        debug!(provider = self.adapter.provider_id(), "running health check");
        self.with_timeout(self.adapter.do_health_check(api_key)).await
    }

    fn calculate_cost(&self, model_id: &str, usage: &TokenUsage) -> f64 {
        match self.adapter.model_pricing(model_id) {
            Some(pricing) => crate::types::calculate_cost(&pricing, usage),
            None => -1.0,
        }
    }

    fn get_rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limit.lock().clone()
    }
}
