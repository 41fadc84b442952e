// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! OutputEvent (Supervisor-produced, pre-enrichment) and StreamEvent
//! (Publisher-produced, tenancy-tagged, type-refined).

use crate::id::{AgentId, ProjectId, SessionId, WorkspaceId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputEventType {
    Stdout,
    Stderr,
    Command,
    Exit,
}

/// Line-granularity record produced by the Supervisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEvent {
    pub session_id: SessionId,
    pub agent_id: AgentId,
    #[serde(rename = "type")]
    pub event_type: OutputEventType,
    pub content: String,
    pub timestamp: String,
    pub line_number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEventType {
    Output,
    Command,
    FileChange,
    TestResult,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Created,
    Edited,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
}

/// Discriminated metadata attached to a StreamEvent, populated selectively
/// per enriched type. Fields are all optional; the whole
/// struct is omitted from the wire form when every field is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamEventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<OutputEventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<ChangeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_status: Option<TestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<TestSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub passed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub total: Option<u32>,
}

impl StreamEventMetadata {
    pub fn is_empty(&self) -> bool {
        self == &StreamEventMetadata::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub session_id: SessionId,
    pub agent_id: AgentId,
    pub project_id: ProjectId,
    pub workspace_id: WorkspaceId,
    #[serde(rename = "type")]
    pub event_type: StreamEventType,
    pub content: String,
    pub timestamp: String,
    pub line_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StreamEventMetadata>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_omitted_when_empty_is_detected() {
        let meta = StreamEventMetadata::default();
        assert!(meta.is_empty());
    }

    #[test]
    fn metadata_not_empty_with_a_field_set() {
        let meta = StreamEventMetadata {
            output_type: Some(OutputEventType::Stdout),
            ..Default::default()
        };
        assert!(!meta.is_empty());
    }

    #[test]
    fn stream_event_serializes_without_metadata_key_when_none() {
        let ev = StreamEvent {
            session_id: SessionId::new("s1"),
            agent_id: AgentId::new("a1"),
            project_id: ProjectId::new("p1"),
            workspace_id: WorkspaceId::new("w1"),
            event_type: StreamEventType::Output,
            content: "hi".into(),
            timestamp: "1970-01-01T00:00:00.000Z".into(),
            line_number: 1,
            metadata: None,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(!json.contains("metadata"));
    }
}
