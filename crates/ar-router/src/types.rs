// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Router request/config shapes.

use ar_core::TaskType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRoutingRequest {
    pub task_type: TaskType,
    #[serde(default)]
    pub estimated_input_tokens: Option<u64>,
    #[serde(default)]
    pub estimated_output_tokens: Option<u64>,
    #[serde(default)]
    pub requires_tools: bool,
    #[serde(default)]
    pub requires_vision: bool,
    #[serde(default)]
    pub requires_streaming: bool,
    #[serde(default)]
    pub context_size_tokens: Option<u64>,
    pub workspace_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub force_model: Option<String>,
    #[serde(default)]
    pub force_provider: Option<String>,
}

impl TaskRoutingRequest {
    pub fn new(task_type: TaskType, workspace_id: impl Into<String>) -> Self {
        Self {
            task_type,
            estimated_input_tokens: None,
            estimated_output_tokens: None,
            requires_tools: false,
            requires_vision: false,
            requires_streaming: false,
            context_size_tokens: None,
            workspace_id: workspace_id.into(),
            project_id: None,
            force_model: None,
            force_provider: None,
        }
    }

    pub fn input_tokens(&self) -> u64 {
        self.estimated_input_tokens.unwrap_or(1000)
    }

    pub fn output_tokens(&self) -> u64 {
        self.estimated_output_tokens.unwrap_or(500)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Auto,
    Economy,
    Quality,
    Balanced,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskOverride {
    #[serde(default)]
    pub preferred_model: Option<String>,
    #[serde(default)]
    pub fallback_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceRoutingConfig {
    pub workspace_id: String,
    pub enabled_providers: Vec<String>,
    #[serde(default = "default_preset")]
    pub preset: Preset,
    #[serde(default)]
    pub task_overrides: HashMap<TaskType, TaskOverride>,
}

fn default_preset() -> Preset {
    Preset::Auto
}

impl WorkspaceRoutingConfig {
    pub fn new(workspace_id: impl Into<String>, enabled_providers: Vec<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            enabled_providers,
            preset: Preset::Auto,
            task_overrides: HashMap::new(),
        }
    }
}
