// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unified request/response shapes the base policy and every vendor
//! adapter speak, independent of any vendor's wire format.

use ar_core::model::ModelPricing;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub stream: bool,
}

impl CompletionRequest {
    /// Base-policy validation: non-empty messages, non-empty model,
    /// positive maxTokens.
    pub fn validate(&self) -> Result<(), crate::error::ProviderError> {
        if self.model.trim().is_empty() {
            return Err(crate::error::ProviderError::InvalidRequest(
                "model must not be empty".into(),
            ));
        }
        if self.messages.is_empty() {
            return Err(crate::error::ProviderError::InvalidRequest(
                "messages must not be empty".into(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(crate::error::ProviderError::InvalidRequest(
                "max_tokens must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
    pub latency: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub delta: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_remaining: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_remaining: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at_ms: Option<i64>,
}

/// Cost of a completion in USD, computed by the base policy's `calculate_cost`.
pub fn calculate_cost(pricing: &ModelPricing, usage: &TokenUsage) -> f64 {
    let input_cost = usage.input_tokens as f64 * pricing.input_price_per_1m / 1_000_000.0;
    let output_cost = usage.output_tokens as f64 * pricing.output_price_per_1m / 1_000_000.0;
    let cached_cost = match (usage.cached_input_tokens, pricing.cached_input_price_per_1m) {
        (Some(cached), Some(cached_price)) => cached as f64 * cached_price / 1_000_000.0,
        _ => 0.0,
    };
    input_cost + output_cost + cached_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing() -> ModelPricing {
        ModelPricing {
            input_price_per_1m: 3.0,
            output_price_per_1m: 15.0,
            cached_input_price_per_1m: Some(0.3),
        }
    }

    #[test]
    fn cost_excludes_cached_tokens_without_cached_pricing() {
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 500,
            cached_input_tokens: Some(200),
        };
        let mut p = pricing();
        p.cached_input_price_per_1m = None;
        let cost = calculate_cost(&p, &usage);
        assert!((cost - (1000.0 * 3.0 / 1e6 + 500.0 * 15.0 / 1e6)).abs() < 1e-9);
    }

    #[test]
    fn cost_adds_cached_cost_as_a_separate_term() {
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 500,
            cached_input_tokens: Some(200),
        };
        let cost = calculate_cost(&pricing(), &usage);
        let expected = 1000.0 * 3.0 / 1e6 + 500.0 * 15.0 / 1e6 + 200.0 * 0.3 / 1e6;
        assert!((cost - expected).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_empty_messages() {
        let req = CompletionRequest {
            model: "m".into(),
            messages: vec![],
            max_tokens: 10,
            temperature: None,
            stream: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_max_tokens() {
        let req = CompletionRequest {
            model: "m".into(),
            messages: vec![Message { role: Role::User, content: "hi".into() }],
            max_tokens: 0,
            temperature: None,
            stream: false,
        };
        assert!(req.validate().is_err());
    }
}
