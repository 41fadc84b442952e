// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Default routing rules: the normative per-task-type table.

use ar_core::model::QualityTier;
use ar_core::TaskType;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TaskRule {
    pub default_model: &'static str,
    pub fallback_models: &'static [&'static str],
    pub quality_tier_preference: QualityTier,
}

impl TaskRule {
    /// Ordered candidate list: default model first, then fallbacks.
    pub fn candidates(&self) -> Vec<&'static str> {
        std::iter::once(self.default_model)
            .chain(self.fallback_models.iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RoutingRules {
    rules: HashMap<TaskType, TaskRule>,
}

impl RoutingRules {
    pub fn get(&self, task_type: TaskType) -> Option<&TaskRule> {
        self.rules.get(&task_type)
    }

    pub fn set(&mut self, task_type: TaskType, rule: TaskRule) {
        self.rules.insert(task_type, rule);
    }
}

impl Default for RoutingRules {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(
            TaskType::SimpleChat,
            TaskRule {
                default_model: "gemini-2.0-flash",
                fallback_models: &["gpt-4o-mini", "claude-3-5-haiku-20241022"],
                quality_tier_preference: QualityTier::Economy,
            },
        );
        rules.insert(
            TaskType::Summarization,
            TaskRule {
                default_model: "gemini-2.0-flash",
                fallback_models: &["gpt-4o-mini", "claude-3-5-haiku-20241022"],
                quality_tier_preference: QualityTier::Economy,
            },
        );
        rules.insert(
            TaskType::Coding,
            TaskRule {
                default_model: "claude-sonnet-4-20250514",
                fallback_models: &["gpt-4o", "deepseek-chat", "gemini-2.0-pro"],
                quality_tier_preference: QualityTier::Standard,
            },
        );
        rules.insert(
            TaskType::Planning,
            TaskRule {
                default_model: "claude-sonnet-4-20250514",
                fallback_models: &["gpt-4o", "gemini-2.0-pro"],
                quality_tier_preference: QualityTier::Standard,
            },
        );
        rules.insert(
            TaskType::Review,
            TaskRule {
                default_model: "claude-sonnet-4-20250514",
                fallback_models: &["gpt-4o", "gemini-2.0-pro"],
                quality_tier_preference: QualityTier::Standard,
            },
        );
        rules.insert(
            TaskType::ComplexReasoning,
            TaskRule {
                default_model: "claude-opus-4-20250514",
                fallback_models: &["claude-sonnet-4-20250514", "gpt-4o", "deepseek-reasoner"],
                quality_tier_preference: QualityTier::Premium,
            },
        );
        rules.insert(
            TaskType::Embedding,
            TaskRule {
                default_model: "text-embedding-3-small",
                fallback_models: &["text-embedding-004", "text-embedding-3-large"],
                quality_tier_preference: QualityTier::Economy,
            },
        );
        Self { rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_task_type_has_a_default_rule() {
        let rules = RoutingRules::default();
        for task_type in TaskType::ALL {
            assert!(rules.get(task_type).is_some(), "missing rule for {task_type:?}");
        }
    }

    #[test]
    fn coding_candidates_match_the_spec_order() {
        let rules = RoutingRules::default();
        let rule = rules.get(TaskType::Coding).unwrap();
        assert_eq!(
            rule.candidates(),
            vec!["claude-sonnet-4-20250514", "gpt-4o", "deepseek-chat", "gemini-2.0-pro"]
        );
    }
}
