// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unified provider error taxonomy, vendor-agnostic.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limited: {0}")]
    RateLimit { message: String, retry_after_ms: Option<u64> },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("context length exceeded: {0}")]
    ContextLength(String),
    #[error("content filtered: {0}")]
    ContentFilter(String),
    #[error("provider server error: {0}")]
    Server(String),
    #[error("provider call timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unknown provider error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Whether the base policy should retry this error for a non-streaming
    /// operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimit { .. }
                | ProviderError::Server(_)
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimit { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}
