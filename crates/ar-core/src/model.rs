// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog row as returned by the Model Catalog Client.
//! Read-only, cached with a per-entry TTL by the catalog client; shared
//! immutable data everywhere else.

use crate::task::TaskType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Economy,
    Standard,
    Premium,
}

impl QualityTier {
    /// Higher is "better" for descending-by-tier sorts (premium > standard > economy).
    pub fn priority(&self) -> u8 {
        match self {
            QualityTier::Economy => 0,
            QualityTier::Standard => 1,
            QualityTier::Premium => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    #[serde(default)]
    pub tools: bool,
    #[serde(default)]
    pub vision: bool,
    #[serde(default)]
    pub streaming: bool,
    #[serde(default)]
    pub embedding: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_price_per_1m: f64,
    pub output_price_per_1m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input_price_per_1m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub model_id: String,
    pub provider: String,
    pub capabilities: ModelCapabilities,
    pub context_window: u64,
    pub max_output_tokens: u64,
    pub pricing: ModelPricing,
    pub quality_tier: QualityTier,
    pub suitable_for: Vec<TaskType>,
    pub available: bool,
}

impl Model {
    pub fn supports_embedding(&self) -> bool {
        self.capabilities.embedding
    }

    /// True iff `suitable_for` is exactly `[Embedding]` — used by the
    /// router to reject embedding-only models from non-embedding tasks.
    pub fn is_embedding_only(&self) -> bool {
        self.suitable_for == [TaskType::Embedding]
    }

    pub fn suitable_for_task(&self, task: TaskType) -> bool {
        self.suitable_for.contains(&task)
    }
}
