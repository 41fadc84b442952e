// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! OpenAI-style adapter: chat format with interleaved
//! system/user/assistant turns, JSON-string tool arguments, embeddings.

use crate::base::VendorAdapter;
use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse, FinishReason, HealthStatus, Role, StreamChunk, TokenUsage, ToolCall};
use ar_core::model::ModelPricing;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    pricing: HashMap<&'static str, ModelPricing>,
}

impl OpenAiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut pricing = HashMap::new();
        pricing.insert(
            "gpt-4o",
            ModelPricing {
                input_price_per_1m: 2.5,
                output_price_per_1m: 10.0,
                cached_input_price_per_1m: Some(1.25),
            },
        );
        pricing.insert(
            "text-embedding-3-small",
            ModelPricing {
                input_price_per_1m: 0.02,
                output_price_per_1m: 0.0,
                cached_input_price_per_1m: None,
            },
        );
        pricing.insert(
            "text-embedding-3-large",
            ModelPricing {
                input_price_per_1m: 0.13,
                output_price_per_1m: 0.0,
                cached_input_price_per_1m: None,
            },
        );
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            pricing,
        }
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<RawToolCall>,
}

#[derive(Deserialize)]
struct RawToolCall {
    id: String,
    function: RawFunctionCall,
}

#[derive(Deserialize)]
struct RawFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
    #[serde(default)]
    prompt_tokens_details: Option<PromptTokensDetails>,
}

#[derive(Deserialize)]
struct PromptTokensDetails {
    #[serde(default)]
    cached_tokens: Option<u64>,
}

fn map_finish_reason(reason: Option<&str>) -> Result<FinishReason, ProviderError> {
    match reason {
        Some("stop") => Ok(FinishReason::EndTurn),
        Some("length") => Ok(FinishReason::MaxTokens),
        Some("tool_calls") => Ok(FinishReason::ToolUse),
        Some("content_filter") => Err(ProviderError::ContentFilter("response blocked by content filter".into())),
        _ => Ok(FinishReason::EndTurn),
    }
}

fn to_openai_body(request: &CompletionRequest) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = request
        .messages
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::Tool => "tool",
            };
            serde_json::json!({"role": role, "content": m.content})
        })
        .collect();
    serde_json::json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "messages": messages,
    })
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    if status.as_u16() == 400 && body.to_lowercase().contains("context length") {
        return ProviderError::ContextLength(body.to_string());
    }
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
        429 => ProviderError::RateLimit { message: body.to_string(), retry_after_ms: None },
        500..=599 => ProviderError::Server(body.to_string()),
        _ => ProviderError::Unknown(format!("status {status}: {body}")),
    }
}

#[async_trait]
impl VendorAdapter for OpenAiProvider {
    fn provider_id(&self) -> &str {
        "openai"
    }

    fn supports_model(&self, model_id: &str) -> bool {
        self.pricing.contains_key(model_id)
    }

    fn model_pricing(&self, model_id: &str) -> Option<ModelPricing> {
        self.pricing.get(model_id).cloned()
    }

    fn supports_embedding(&self) -> bool {
        true
    }

    async fn do_complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        let body = to_openai_body(request);
        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {e}")))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Unknown("no choices in response".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|raw| {
                let arguments = serde_json::from_str(&raw.function.arguments)
                    .unwrap_or(serde_json::Value::String(raw.function.arguments));
                ToolCall { id: raw.id, name: raw.function.name, arguments }
            })
            .collect();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            finish_reason: map_finish_reason(choice.finish_reason.as_deref())?,
            usage: TokenUsage {
                input_tokens: parsed.usage.prompt_tokens,
                output_tokens: parsed.usage.completion_tokens,
                cached_input_tokens: parsed.usage.prompt_tokens_details.and_then(|d| d.cached_tokens),
            },
            latency: Duration::ZERO,
        })
    }

    async fn do_stream(
        &self,
        _request: &CompletionRequest,
        _api_key: &str,
    ) -> Result<mpsc::Receiver<StreamChunk>, ProviderError> {
        Err(ProviderError::Unknown(
            "openai streaming not wired in this deployment".into(),
        ))
    }

    async fn do_embed(&self, text: &str, model: &str, api_key: &str) -> Result<Vec<f32>, ProviderError> {
        let body = serde_json::json!({"model": model, "input": text});
        let resp = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        #[derive(Deserialize)]
        struct EmbeddingResponse {
            data: Vec<EmbeddingDatum>,
        }
        #[derive(Deserialize)]
        struct EmbeddingDatum {
            embedding: Vec<f32>,
        }
        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {e}")))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| ProviderError::Unknown("no embedding in response".into()))
    }

    async fn do_health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError> {
        let resp = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(if resp.status().is_success() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_content_filter_surfaces_as_error() {
        assert!(map_finish_reason(Some("content_filter")).is_err());
    }

    #[test]
    fn finish_reason_mapping_matches_spec_table() {
        assert_eq!(map_finish_reason(Some("stop")).unwrap(), FinishReason::EndTurn);
        assert_eq!(map_finish_reason(Some("length")).unwrap(), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("tool_calls")).unwrap(), FinishReason::ToolUse);
    }

    #[test]
    fn context_length_detected_from_400_message_text() {
        let err = map_status_error(reqwest::StatusCode::BAD_REQUEST, "maximum context length exceeded");
        assert!(matches!(err, ProviderError::ContextLength(_)));
    }

    #[test]
    fn supports_embedding_is_true() {
        assert!(OpenAiProvider::default().supports_embedding());
    }
}
