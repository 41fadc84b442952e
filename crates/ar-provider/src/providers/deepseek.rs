// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! OpenAI-compatible (DeepSeek-style) adapter: the OpenAI
//! flow with a vendor base URL override and no embeddings support.

use crate::base::VendorAdapter;
use crate::error::ProviderError;
use crate::providers::openai::OpenAiProvider;
use crate::types::{CompletionRequest, CompletionResponse, HealthStatus, StreamChunk};
use ar_core::model::ModelPricing;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Delegates wire-format handling to the OpenAI adapter against a
/// different base URL and model/pricing table, since DeepSeek's API is
/// OpenAI-compatible by design.
pub struct DeepSeekProvider {
    inner: OpenAiProvider,
    pricing: HashMap<&'static str, ModelPricing>,
}

impl DeepSeekProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut pricing = HashMap::new();
        pricing.insert(
            "deepseek-chat",
            ModelPricing {
                input_price_per_1m: 0.27,
                output_price_per_1m: 1.1,
                cached_input_price_per_1m: Some(0.07),
            },
        );
        pricing.insert(
            "deepseek-reasoner",
            ModelPricing {
                input_price_per_1m: 0.55,
                output_price_per_1m: 2.19,
                cached_input_price_per_1m: Some(0.14),
            },
        );
        Self {
            inner: OpenAiProvider::new(base_url),
            pricing,
        }
    }
}

impl Default for DeepSeekProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl VendorAdapter for DeepSeekProvider {
    fn provider_id(&self) -> &str {
        "deepseek"
    }

    fn supports_model(&self, model_id: &str) -> bool {
        self.pricing.contains_key(model_id)
    }

    fn model_pricing(&self, model_id: &str) -> Option<ModelPricing> {
        self.pricing.get(model_id).cloned()
    }

    fn supports_embedding(&self) -> bool {
        false
    }

    async fn do_complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        self.inner.do_complete(request, api_key).await
    }

    async fn do_stream(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<mpsc::Receiver<StreamChunk>, ProviderError> {
        self.inner.do_stream(request, api_key).await
    }

    async fn do_embed(&self, _text: &str, _model: &str, _api_key: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::InvalidRequest(
            "deepseek does not offer embeddings".into(),
        ))
    }

    async fn do_health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError> {
        self.inner.do_health_check(api_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declines_embeddings() {
        assert!(!DeepSeekProvider::default().supports_embedding());
    }

    #[test]
    fn supports_its_own_model_ids_only() {
        let provider = DeepSeekProvider::default();
        assert!(provider.supports_model("deepseek-chat"));
        assert!(!provider.supports_model("gpt-4o"));
    }
}
