// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output Parser: pure classification of a raw CLI output
//! line into one of {output, command, file_change, test_result, error}
//! plus an optional enriched payload. Rules apply in order; first match
//! wins. All pattern matching happens on ANSI-stripped text; the original
//! content is preserved by the caller for the StreamEvent.

use crate::ansi::strip_ansi;
use ar_core::event::{ChangeType, TestStatus, TestSummary};
use ar_core::StreamEventType;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFileChange {
    pub file_name: String,
    pub file_path: String,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTestResult {
    FileLevel {
        file_path: String,
        status: TestStatus,
    },
    Individual {
        test_name: String,
        status: TestStatus,
    },
    Summary(TestSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedError {
    pub error_type: String,
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Output,
    Command,
    FileChange(ParsedFileChange),
    TestResult(ParsedTestResult),
    Error(ParsedError),
}

impl ParsedLine {
    pub fn classification(&self) -> StreamEventType {
        match self {
            ParsedLine::Output => StreamEventType::Output,
            ParsedLine::Command => StreamEventType::Command,
            ParsedLine::FileChange(_) => StreamEventType::FileChange,
            ParsedLine::TestResult(_) => StreamEventType::TestResult,
            ParsedLine::Error(_) => StreamEventType::Error,
        }
    }
}

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

lazy_regex!(command_re, r"^\$\s+.+");
lazy_regex!(
    file_change_re,
    r"^>\s*(Creating|Writing|Adding|Editing|Modifying|Updating|Deleting|Removing)\s+(\S.*?)(\.\.\.)?$"
);
lazy_regex!(pass_fail_re, r"^(PASS|FAIL)\s+(\S+)");
lazy_regex!(
    summary_re,
    r"(?i)Tests:\s*(\d+)\s*passed(?:,\s*(\d+)\s*skipped)?(?:,\s*(\d+)\s*failed)?(?:,\s*(\d+)\s*total)?"
);
lazy_regex!(tap_re, r"^(not ok|ok)\s+\d+\s*-\s*(.+)");
lazy_regex!(
    glyph_re,
    r"^(?:[✓✔]|[✕✗✘×])\s*(.+?)(?:\s*\(([^)]+)\))?$"
);
lazy_regex!(
    runtime_error_re,
    r"^(SyntaxError|TypeError|ReferenceError|RangeError|URIError|EvalError|Error):\s*(.+)"
);
lazy_regex!(tsc_error_re, r"^error TS(\d+):\s*(.+)");
lazy_regex!(npm_error_re, r"^npm ERR!\s*(?:(\d+)\s+)?(.+)");

fn looks_like_file_path(candidate: &str) -> bool {
    let last_segment = candidate.rsplit('/').next().unwrap_or(candidate);
    last_segment.contains('.')
}

fn classify_change_type(verb: &str) -> ChangeType {
    match verb {
        "Creating" | "Writing" | "Adding" => ChangeType::Created,
        "Editing" | "Modifying" | "Updating" => ChangeType::Edited,
        "Deleting" | "Removing" => ChangeType::Deleted,
        _ => unreachable!("verb set matches file_change_re alternation"),
    }
}

fn try_file_change(line: &str) -> Option<ParsedFileChange> {
    let caps = file_change_re().captures(line)?;
    let verb = caps.get(1)?.as_str();
    let path = caps.get(2)?.as_str();
    if !looks_like_file_path(path) {
        return None;
    }
    let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
    Some(ParsedFileChange {
        file_name,
        file_path: path.to_string(),
        change_type: classify_change_type(verb),
    })
}

fn try_test_result(stripped: &str) -> Option<ParsedTestResult> {
    if let Some(caps) = pass_fail_re().captures(stripped) {
        let status = if &caps[1] == "PASS" {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        return Some(ParsedTestResult::FileLevel {
            file_path: caps[2].to_string(),
            status,
        });
    }
    if let Some(caps) = summary_re().captures(stripped) {
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let passed = num(1).unwrap_or(0);
        let skipped = num(2).unwrap_or(0);
        let failed = num(3).unwrap_or(0);
        let total = num(4);
        return Some(ParsedTestResult::Summary(TestSummary {
            passed,
            skipped,
            failed,
            total,
        }));
    }
    if let Some(caps) = tap_re().captures(stripped) {
        let status = if &caps[1] == "ok" {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        return Some(ParsedTestResult::Individual {
            test_name: caps[2].trim().to_string(),
            status,
        });
    }
    if let Some(caps) = glyph_re().captures(stripped) {
        let glyph = stripped.chars().next()?;
        let status = if glyph == '\u{2713}' || glyph == '\u{2714}' {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        return Some(ParsedTestResult::Individual {
            test_name: caps[1].trim().to_string(),
            status,
        });
    }
    None
}

/// Overall status for a Summary result: failed iff `failed > 0`.
pub fn summary_overall_status(summary: &TestSummary) -> TestStatus {
    if summary.failed > 0 {
        TestStatus::Failed
    } else {
        TestStatus::Passed
    }
}

fn try_error(stripped: &str) -> Option<ParsedError> {
    if let Some(caps) = runtime_error_re().captures(stripped) {
        return Some(ParsedError {
            error_type: caps[1].to_string(),
            error_code: None,
        });
    }
    if let Some(caps) = tsc_error_re().captures(stripped) {
        return Some(ParsedError {
            error_type: "TypeCheckError".to_string(),
            error_code: Some(format!("TS{}", &caps[1])),
        });
    }
    if let Some(caps) = npm_error_re().captures(stripped) {
        return Some(ParsedError {
            error_type: "PackageManagerError".to_string(),
            error_code: caps.get(1).map(|m| m.as_str().to_string()),
        });
    }
    None
}

/// Classify a raw output line. Pure function, no I/O.
pub fn parse(line: &str) -> ParsedLine {
    if command_re().is_match(line) {
        return ParsedLine::Command;
    }
    if let Some(fc) = try_file_change(line) {
        return ParsedLine::FileChange(fc);
    }
    let stripped = strip_ansi(line);
    if let Some(tr) = try_test_result(&stripped) {
        return ParsedLine::TestResult(tr);
    }
    if let Some(err) = try_error(&stripped) {
        return ParsedLine::Error(err);
    }
    ParsedLine::Output
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
