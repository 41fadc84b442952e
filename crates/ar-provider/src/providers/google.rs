// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Google-style adapter: system instruction lives outside
//! the content array, assistant role is remapped to `model`, SAFETY finish
//! reason becomes a content-filter error, embeddings use a distinct model id.

use crate::base::VendorAdapter;
use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse, FinishReason, HealthStatus, Role, StreamChunk, TokenUsage};
use ar_core::model::ModelPricing;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: reqwest::Client,
    base_url: String,
    pricing: HashMap<&'static str, ModelPricing>,
}

impl GoogleProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut pricing = HashMap::new();
        pricing.insert(
            "gemini-2.0-flash",
            ModelPricing {
                input_price_per_1m: 0.1,
                output_price_per_1m: 0.4,
                cached_input_price_per_1m: None,
            },
        );
        pricing.insert(
            "gemini-2.0-pro",
            ModelPricing {
                input_price_per_1m: 1.25,
                output_price_per_1m: 5.0,
                cached_input_price_per_1m: None,
            },
        );
        pricing.insert(
            "text-embedding-004",
            ModelPricing {
                input_price_per_1m: 0.0,
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

impl Default for GoogleProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn to_google_body(request: &CompletionRequest) -> serde_json::Value {
    let system: Vec<&str> = request
        .messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let contents: Vec<serde_json::Value> = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            let role = match m.role {
                Role::Assistant => "model",
                _ => "user",
            };
            serde_json::json!({"role": role, "parts": [{"text": m.content}]})
        })
        .collect();

    let mut body = serde_json::json!({
        "contents": contents,
        "generationConfig": {"maxOutputTokens": request.max_tokens},
    });
    if !system.is_empty() {
        body["systemInstruction"] = serde_json::json!({"parts": [{"text": system.join("\n")}]});
    }
    body
}

#[derive(Deserialize)]
struct GoogleGenerateResponse {
    candidates: Vec<GoogleCandidate>,
    #[serde(default)]
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GoogleUsage>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: GoogleContent,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GoogleContent {
    parts: Vec<GooglePart>,
}

#[derive(Deserialize)]
struct GooglePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GoogleUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u64,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u64,
}

fn map_finish_reason(reason: Option<&str>) -> Result<FinishReason, ProviderError> {
    match reason {
        Some("MAX_TOKENS") => Ok(FinishReason::MaxTokens),
        // SAFETY is surfaced as content-filter before returning.
        Some("SAFETY") => Err(ProviderError::ContentFilter("blocked by safety filter".into())),
        _ => Ok(FinishReason::EndTurn),
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        404 => ProviderError::ModelNotFound(body.to_string()),
        429 => ProviderError::RateLimit { message: body.to_string(), retry_after_ms: None },
        500..=599 => ProviderError::Server(body.to_string()),
        _ => ProviderError::Unknown(format!("status {status}: {body}")),
    }
}

#[async_trait]
impl VendorAdapter for GoogleProvider {
    fn provider_id(&self) -> &str {
        "google"
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
        let body = to_google_body(request);
        let resp = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.base_url, request.model, api_key
            ))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_status_error(status, &text));
        }

        let parsed: GoogleGenerateResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {e}")))?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Unknown("no candidates in response".into()))?;
        let finish_reason = map_finish_reason(candidate.finish_reason.as_deref())?;
        let content = candidate.content.parts.into_iter().map(|p| p.text).collect::<String>();
        let usage = parsed.usage_metadata.unwrap_or(GoogleUsage {
            prompt_token_count: 0,
            candidates_token_count: 0,
        });

        Ok(CompletionResponse {
            content,
            tool_calls: vec![],
            finish_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                cached_input_tokens: None,
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
            "google streaming not wired in this deployment".into(),
        ))
    }

    async fn do_embed(&self, text: &str, model: &str, api_key: &str) -> Result<Vec<f32>, ProviderError> {
        let body = serde_json::json!({
            "model": format!("models/{model}"),
            "content": {"parts": [{"text": text}]},
        });
        let resp = self
            .client
            .post(format!("{}/v1beta/models/{}:embedContent?key={}", self.base_url, model, api_key))
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
        struct EmbedResponse {
            embedding: EmbeddingValues,
        }
        #[derive(Deserialize)]
        struct EmbeddingValues {
            values: Vec<f32>,
        }
        let parsed: EmbedResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {e}")))?;
        Ok(parsed.embedding.values)
    }

    async fn do_health_check(&self, api_key: &str) -> Result<HealthStatus, ProviderError> {
        let resp = self
            .client
            .get(format!("{}/v1beta/models?key={}", self.base_url, api_key))
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
    use crate::types::Message;

    #[test]
    fn system_instruction_is_lifted_out_of_contents() {
        let request = CompletionRequest {
            model: "gemini-2.0-flash".into(),
            messages: vec![
                Message { role: Role::System, content: "be terse".into() },
                Message { role: Role::Assistant, content: "ok".into() },
            ],
            max_tokens: 100,
            temperature: None,
            stream: false,
        };
        let body = to_google_body(&request);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
        assert_eq!(body["contents"][0]["role"], "model");
    }

    #[test]
    fn safety_finish_reason_is_a_content_filter_error() {
        assert!(map_finish_reason(Some("SAFETY")).is_err());
    }

    #[test]
    fn supports_embedding_via_distinct_model() {
        let provider = GoogleProvider::default();
        assert!(provider.supports_model("text-embedding-004"));
        assert!(provider.supports_embedding());
    }
}
