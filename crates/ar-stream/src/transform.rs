// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transform an OutputEvent into an enriched, tenancy-tagged StreamEvent.
//! Copies identity/tenancy fields, refines `type` via the
//! Output Parser (unless the source was already `command`), and populates
//! `metadata` selectively per enriched type.

use crate::parser::{self, ParsedLine, ParsedTestResult};
use ar_core::event::StreamEventMetadata;
use ar_core::{OutputEvent, OutputEventType, ProjectId, StreamEvent, StreamEventType, WorkspaceId};

pub fn enrich(event: &OutputEvent, project_id: &ProjectId, workspace_id: &WorkspaceId) -> StreamEvent {
    let (event_type, metadata) = classify(event);
    StreamEvent {
        session_id: event.session_id.clone(),
        agent_id: event.agent_id.clone(),
        project_id: project_id.clone(),
        workspace_id: workspace_id.clone(),
        event_type,
        content: event.content.clone(),
        timestamp: event.timestamp.clone(),
        line_number: event.line_number,
        metadata: metadata.filter(|m| !m.is_empty()),
    }
}

fn classify(event: &OutputEvent) -> (StreamEventType, Option<StreamEventMetadata>) {
    if event.event_type == OutputEventType::Command {
        return (StreamEventType::Command, None);
    }

    let parsed = parser::parse(&event.content);
    match parsed {
        ParsedLine::Command => (StreamEventType::Command, None),
        ParsedLine::Output => {
            let output_type = match event.event_type {
                OutputEventType::Stdout => Some(OutputEventType::Stdout),
                OutputEventType::Stderr => Some(OutputEventType::Stderr),
                _ => None,
            };
            (
                StreamEventType::Output,
                Some(StreamEventMetadata {
                    output_type,
                    ..Default::default()
                }),
            )
        }
        ParsedLine::FileChange(fc) => (
            StreamEventType::FileChange,
            Some(StreamEventMetadata {
                file_name: Some(fc.file_name),
                file_path: Some(fc.file_path),
                change_type: Some(fc.change_type),
                ..Default::default()
            }),
        ),
        ParsedLine::TestResult(result) => {
            let metadata = match result {
                ParsedTestResult::FileLevel { file_path, status } => StreamEventMetadata {
                    test_name: file_path.rsplit('/').next().map(|s| s.to_string()),
                    test_status: Some(status),
                    file_path: Some(file_path),
                    ..Default::default()
                },
                ParsedTestResult::Individual { test_name, status } => StreamEventMetadata {
                    test_name: Some(test_name),
                    test_status: Some(status),
                    ..Default::default()
                },
                ParsedTestResult::Summary(summary) => StreamEventMetadata {
                    summary: Some(summary),
                    ..Default::default()
                },
            };
            (StreamEventType::TestResult, Some(metadata))
        }
        ParsedLine::Error(err) => (
            StreamEventType::Error,
            Some(StreamEventMetadata {
                error_type: Some(err.error_type),
                error_code: err.error_code,
                ..Default::default()
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ar_core::{AgentId, SessionId};

    fn event(event_type: OutputEventType, content: &str) -> OutputEvent {
        OutputEvent {
            session_id: SessionId::new("s1"),
            agent_id: AgentId::new("a1"),
            event_type,
            content: content.to_string(),
            timestamp: "1970-01-01T00:00:00.000Z".to_string(),
            line_number: 1,
        }
    }

    fn ids() -> (ProjectId, WorkspaceId) {
        (ProjectId::new("prj-1"), WorkspaceId::new("ws-1"))
    }

    #[test]
    fn plain_stdout_becomes_output_with_output_type() {
        let (p, w) = ids();
        let ev = enrich(&event(OutputEventType::Stdout, "Building project..."), &p, &w);
        assert_eq!(ev.event_type, StreamEventType::Output);
        assert_eq!(
            ev.metadata.unwrap().output_type,
            Some(OutputEventType::Stdout)
        );
    }

    #[test]
    fn pass_line_produces_test_name_status_and_path() {
        let (p, w) = ids();
        let ev = enrich(
            &event(OutputEventType::Stdout, "PASS src/x.spec.ts"),
            &p,
            &w,
        );
        assert_eq!(ev.event_type, StreamEventType::TestResult);
        let meta = ev.metadata.unwrap();
        assert_eq!(meta.test_name.as_deref(), Some("x.spec.ts"));
        assert_eq!(meta.file_path.as_deref(), Some("src/x.spec.ts"));
    }

    #[test]
    fn command_source_is_preserved_without_reparsing() {
        let (p, w) = ids();
        let ev = enrich(
            &event(OutputEventType::Command, "npm test"),
            &p,
            &w,
        );
        assert_eq!(ev.event_type, StreamEventType::Command);
        assert!(ev.metadata.is_none());
    }

    #[test]
    fn metadata_is_omitted_entirely_when_empty() {
        let (p, w) = ids();
        // exit events carry no stdout/stderr provenance, so output_type stays None
        // and the whole metadata struct collapses to None.
        let ev = enrich(&event(OutputEventType::Exit, "done"), &p, &w);
        assert!(ev.metadata.is_none());
    }
}
