// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Task Router: multi-stage model selection over a fixed
//! catalog snapshot, a rules table, and per-workspace routing config.

use crate::error::RoutingError;
use crate::rules::RoutingRules;
use crate::types::{Preset, TaskRoutingRequest, WorkspaceRoutingConfig};
use ar_core::{Alternative, Model, RoutingDecision, TaskType};
use ar_provider::ProviderRegistry;
use parking_lot::RwLock;
use std::collections::HashSet;

pub struct TaskRouter {
    rules: RwLock<RoutingRules>,
}

impl Default for TaskRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRouter {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(RoutingRules::default()),
        }
    }

    pub fn set_routing_rules(&self, rules: RoutingRules) {
        *self.rules.write() = rules;
    }

    pub fn get_routing_rules(&self) -> RoutingRules {
        self.rules.read().clone()
    }

    pub fn route_task(
        &self,
        catalog: &[Model],
        request: &TaskRoutingRequest,
        config: &WorkspaceRoutingConfig,
    ) -> Result<RoutingDecision, RoutingError> {
        if config.enabled_providers.is_empty() {
            return Err(RoutingError {
                task_type: request.task_type,
                attempted_models: vec![],
            });
        }

        let mut alternatives = Vec::new();
        let mut attempted = Vec::new();
        let enabled: HashSet<&str> = config.enabled_providers.iter().map(|s| s.as_str()).collect();

        if let Some(model_id) = &request.force_model {
            attempted.push(model_id.clone());
            match catalog.iter().find(|m| &m.model_id == model_id) {
                Some(model) if enabled.contains(model.provider.as_str()) => {
                    let mut reason = "forced by caller".to_string();
                    if !capability_check(model, request) {
                        reason.push_str(" (warning: model does not satisfy all requested capabilities)");
                    }
                    return Ok(self.decision(model, request, reason, alternatives));
                }
                Some(model) => alternatives.push(self.rejected(model, "provider not in enabledProviders")),
                None => alternatives.push(Alternative {
                    model_id: model_id.clone(),
                    provider: "unknown".to_string(),
                    estimated_cost: -1.0,
                    reason: "forceModel not found in catalog".to_string(),
                }),
            }
        }

        if let Some(provider) = &request.force_provider {
            if enabled.contains(provider.as_str()) {
                let mut candidates: Vec<&Model> = catalog
                    .iter()
                    .filter(|m| &m.provider == provider && m.suitable_for_task(request.task_type))
                    .collect();
                candidates.sort_by(|a, b| a.pricing.input_price_per_1m.total_cmp(&b.pricing.input_price_per_1m));
                for model in &candidates {
                    attempted.push(model.model_id.clone());
                    if capability_check(model, request) {
                        return Ok(self.decision(model, request, "forceProvider".to_string(), alternatives));
                    }
                    alternatives.push(self.rejected(model, "capability mismatch"));
                }
            } else {
                alternatives.push(Alternative {
                    model_id: String::new(),
                    provider: provider.clone(),
                    estimated_cost: -1.0,
                    reason: "forceProvider not in enabledProviders".to_string(),
                });
            }
        }

        if let Some(task_override) = config.task_overrides.get(&request.task_type) {
            for candidate in [&task_override.preferred_model, &task_override.fallback_model] {
                if let Some(model_id) = candidate {
                    attempted.push(model_id.clone());
                    if let Some(model) = self.check_generic(catalog, model_id, &enabled, request, &mut alternatives) {
                        return Ok(self.decision(&model, request, "workspace task override".to_string(), alternatives));
                    }
                }
            }
        }

        if matches!(config.preset, Preset::Economy | Preset::Quality) {
            let mut candidates: Vec<&Model> = catalog
                .iter()
                .filter(|m| enabled.contains(m.provider.as_str()) && m.suitable_for_task(request.task_type))
                .collect();
            match config.preset {
                Preset::Economy => {
                    candidates.sort_by(|a, b| a.pricing.input_price_per_1m.total_cmp(&b.pricing.input_price_per_1m));
                }
                Preset::Quality => {
                    candidates.sort_by(|a, b| b.quality_tier.priority().cmp(&a.quality_tier.priority()));
                }
                _ => unreachable!(),
            }
            for model in &candidates {
                attempted.push(model.model_id.clone());
                if capability_check(model, request) {
                    return Ok(self.decision(model, request, format!("{:?} preset", config.preset), alternatives));
                }
                alternatives.push(self.rejected(model, "capability mismatch"));
            }
        }

        let rules = self.rules.read();
        if let Some(rule) = rules.get(request.task_type) {
            for model_id in rule.candidates() {
                attempted.push(model_id.to_string());
                if let Some(model) = self.check_generic(catalog, model_id, &enabled, request, &mut alternatives) {
                    return Ok(self.decision(&model, request, "default rules".to_string(), alternatives));
                }
            }
        }
        drop(rules);

        let mut remaining: Vec<&Model> = catalog
            .iter()
            .filter(|m| {
                enabled.contains(m.provider.as_str())
                    && m.suitable_for_task(request.task_type)
                    && !attempted.contains(&m.model_id)
            })
            .collect();
        remaining.sort_by(|a, b| a.pricing.input_price_per_1m.total_cmp(&b.pricing.input_price_per_1m));
        for model in &remaining {
            attempted.push(model.model_id.clone());
            if capability_check(model, request) {
                return Ok(self.decision(model, request, "registry fallback".to_string(), alternatives));
            }
            alternatives.push(self.rejected(model, "capability mismatch"));
        }

        Err(RoutingError {
            task_type: request.task_type,
            attempted_models: attempted,
        })
    }

    fn check_generic(
        &self,
        catalog: &[Model],
        model_id: &str,
        enabled: &HashSet<&str>,
        request: &TaskRoutingRequest,
        alternatives: &mut Vec<Alternative>,
    ) -> Option<Model> {
        let model = catalog.iter().find(|m| m.model_id == model_id)?;
        if !enabled.contains(model.provider.as_str()) {
            alternatives.push(self.rejected(model, "provider not in enabledProviders"));
            return None;
        }
        if !capability_check(model, request) {
            alternatives.push(self.rejected(model, "capability mismatch"));
            return None;
        }
        Some(model.clone())
    }

    fn rejected(&self, model: &Model, reason: &str) -> Alternative {
        Alternative {
            model_id: model.model_id.clone(),
            provider: model.provider.clone(),
            estimated_cost: -1.0,
            reason: reason.to_string(),
        }
    }

    fn decision(
        &self,
        model: &Model,
        request: &TaskRoutingRequest,
        reason: String,
        alternatives: Vec<Alternative>,
    ) -> RoutingDecision {
        RoutingDecision {
            selected_model: model.model_id.clone(),
            provider: model.provider.clone(),
            reason,
            estimated_cost: estimate_cost_from_model(model, request.input_tokens(), request.output_tokens()),
            alternatives,
        }
    }

    /// `exists ∧ available ∧ provider enabled in registry ∧ provider in enabled list`.
    pub fn is_model_available(&self, catalog: &[Model], model_id: &str, registry: &ProviderRegistry, config: &WorkspaceRoutingConfig) -> bool {
        let Some(model) = catalog.iter().find(|m| m.model_id == model_id) else {
            return false;
        };
        model.available
            && registry.is_enabled(&model.provider)
            && config.enabled_providers.iter().any(|p| p == &model.provider)
    }

    /// `TaskType -> Model[]` grouping over catalog `available=true` models
    /// from enabled providers.
    pub fn available_models(&self, catalog: &[Model], config: &WorkspaceRoutingConfig) -> Vec<(TaskType, Vec<Model>)> {
        let enabled: HashSet<&str> = config.enabled_providers.iter().map(|s| s.as_str()).collect();
        TaskType::ALL
            .into_iter()
            .map(|task_type| {
                let models: Vec<Model> = catalog
                    .iter()
                    .filter(|m| m.available && enabled.contains(m.provider.as_str()) && m.suitable_for_task(task_type))
                    .cloned()
                    .collect();
                (task_type, models)
            })
            .collect()
    }
}

/// `estimateCost(modelId, input, output)` — returns `-1` when pricing
/// lookup fails, distinct from a legitimate zero.
pub fn estimate_cost(catalog: &[Model], model_id: &str, input_tokens: u64, output_tokens: u64) -> f64 {
    match catalog.iter().find(|m| m.model_id == model_id) {
        Some(model) => estimate_cost_from_model(model, input_tokens, output_tokens),
        None => -1.0,
    }
}

fn estimate_cost_from_model(model: &Model, input_tokens: u64, output_tokens: u64) -> f64 {
    (input_tokens as f64 * model.pricing.input_price_per_1m + output_tokens as f64 * model.pricing.output_price_per_1m)
        / 1_000_000.0
}

/// Capability validation for a candidate model against a request.
fn capability_check(model: &Model, request: &TaskRoutingRequest) -> bool {
    if request.requires_tools && !model.capabilities.tools {
        return false;
    }
    if request.requires_vision && !model.capabilities.vision {
        return false;
    }
    if request.requires_streaming && !model.capabilities.streaming {
        return false;
    }
    if let Some(context_size) = request.context_size_tokens {
        if model.context_window < context_size {
            return false;
        }
    }
    if request.task_type != TaskType::Embedding && model.is_embedding_only() {
        return false;
    }
    if request.task_type == TaskType::Embedding && !model.supports_embedding() {
        return false;
    }
    true
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
