// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! TaskType: the routing dimension used throughout the catalog and router.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Coding,
    Planning,
    Review,
    Summarization,
    Embedding,
    SimpleChat,
    ComplexReasoning,
}

impl TaskType {
    pub const ALL: [TaskType; 7] = [
        TaskType::Coding,
        TaskType::Planning,
        TaskType::Review,
        TaskType::Summarization,
        TaskType::Embedding,
        TaskType::SimpleChat,
        TaskType::ComplexReasoning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Coding => "coding",
            TaskType::Planning => "planning",
            TaskType::Review => "review",
            TaskType::Summarization => "summarization",
            TaskType::Embedding => "embedding",
            TaskType::SimpleChat => "simple_chat",
            TaskType::ComplexReasoning => "complex_reasoning",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_serde_json() {
        let json = serde_json::to_string(&TaskType::ComplexReasoning).unwrap();
        assert_eq!(json, "\"complex_reasoning\"");
        let back: TaskType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskType::ComplexReasoning);
    }
}
