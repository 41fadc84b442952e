// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RoutingDecision: the outcome of routing a task to a model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub model_id: String,
    pub provider: String,
    pub estimated_cost: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub selected_model: String,
    pub provider: String,
    pub reason: String,
    pub estimated_cost: f64,
    pub alternatives: Vec<Alternative>,
}
