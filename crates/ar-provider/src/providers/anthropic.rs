// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Anthropic-style adapter: system message is a top-level
//! field, tool calls live in content blocks, no embeddings.

use crate::base::VendorAdapter;
use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse, FinishReason, HealthStatus, Role, StreamChunk, TokenUsage, ToolCall};
use ar_core::model::ModelPricing;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const HEALTH_CHECK_MODEL: &str = "claude-3-5-haiku-20241022";

pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: String,
    pricing: HashMap<&'static str, ModelPricing>,
}

impl AnthropicProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut pricing = HashMap::new();
        pricing.insert(
            "claude-sonnet-4-20250514",
            ModelPricing {
                input_price_per_1m: 3.0,
                output_price_per_1m: 15.0,
                cached_input_price_per_1m: Some(0.3),
            },
        );
        pricing.insert(
            "claude-opus-4-20250514",
            ModelPricing {
                input_price_per_1m: 15.0,
                output_price_per_1m: 75.0,
                cached_input_price_per_1m: Some(1.5),
            },
        );
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            pricing,
        }
    }
}

impl Default for AnthropicProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Deserialize)]
struct AnthropicMessageResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: serde_json::Value },
}

#[derive(Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
    #[serde(default)]
    cache_read_input_tokens: Option<u64>,
}

fn map_finish_reason(stop_reason: Option<&str>) -> FinishReason {
    match stop_reason {
        Some("end_turn") => FinishReason::EndTurn,
        Some("max_tokens") => FinishReason::MaxTokens,
        Some("stop_sequence") => FinishReason::StopSequence,
        Some("tool_use") => FinishReason::ToolUse,
        _ => FinishReason::EndTurn,
    }
}

fn to_anthropic_body(request: &CompletionRequest) -> serde_json::Value {
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let turns: Vec<serde_json::Value> = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            serde_json::json!({
                "role": match m.role {
                    Role::Assistant => "assistant",
                    _ => "user",
                },
                "content": m.content,
            })
        })
        .collect();
    serde_json::json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "system": system.join("\n"),
        "messages": turns,
    })
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
        413 => ProviderError::ContextLength(body.to_string()),
        429 => ProviderError::RateLimit { message: body.to_string(), retry_after_ms: None },
        500..=599 => ProviderError::Server(body.to_string()),
        _ => ProviderError::Unknown(format!("status {status}: {body}")),
    }
}

#[async_trait]
impl VendorAdapter for AnthropicProvider {
    fn provider_id(&self) -> &str {
        "anthropic"
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
        let body = to_anthropic_body(request);
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        let parsed: AnthropicMessageResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {e}")))?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for block in parsed.content {
            match block {
                AnthropicContentBlock::Text { text } => content.push_str(&text),
                AnthropicContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall { id, name, arguments: input });
                }
            }
        }

        Ok(CompletionResponse {
            content,
            tool_calls,
            finish_reason: map_finish_reason(parsed.stop_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: parsed.usage.input_tokens,
                output_tokens: parsed.usage.output_tokens,
                cached_input_tokens: parsed.usage.cache_read_input_tokens,
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
            "anthropic streaming not wired in this deployment".into(),
        ))
    }

    async fn do_embed(&self, _text: &str, _model: &str, _api_key: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::InvalidRequest(
            "anthropic does not offer embeddings".into(),
        ))
    }

    async fn do_health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError> {
        let body = serde_json::json!({
            "model": HEALTH_CHECK_MODEL,
            "max_tokens": 1,
            "messages": [{"role": "user", "content": "hi"}],
        });
        let resp = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        // 529 (overloaded) and 429 (rate limited) still indicate a valid
        // key, so they count as healthy.
        let status = resp.status().as_u16();
        if resp.status().is_success() || status == 529 || status == 429 {
            Ok(HealthStatus::Healthy)
        } else if status == 401 || status == 403 {
            Ok(HealthStatus::Unhealthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;

    #[test]
    fn request_body_lifts_system_messages_out_of_the_turn_list() {
        let request = CompletionRequest {
            model: "claude-sonnet-4-20250514".into(),
            messages: vec![
                Message { role: Role::System, content: "be terse".into() },
                Message { role: Role::User, content: "hi".into() },
            ],
            max_tokens: 100,
            temperature: None,
            stream: false,
        };
        let body = to_anthropic_body(&request);
        assert_eq!(body["system"], "be terse");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn finish_reason_mapping_matches_spec_table() {
        assert_eq!(map_finish_reason(Some("end_turn")), FinishReason::EndTurn);
        assert_eq!(map_finish_reason(Some("max_tokens")), FinishReason::MaxTokens);
        assert_eq!(map_finish_reason(Some("stop_sequence")), FinishReason::StopSequence);
        assert_eq!(map_finish_reason(Some("tool_use")), FinishReason::ToolUse);
    }

    #[test]
    fn provider_does_not_claim_unknown_models() {
        let provider = AnthropicProvider::default();
        assert!(provider.supports_model("claude-sonnet-4-20250514"));
        assert!(!provider.supports_model("gpt-4o"));
    }
}
