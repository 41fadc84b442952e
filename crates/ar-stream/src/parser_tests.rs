use super::*;

#[test]
fn classifies_command_lines() {
    assert_eq!(parse("$ npm test"), ParsedLine::Command);
}

#[test]
fn classifies_file_creation() {
    let parsed = parse("> Creating src/foo.rs...");
    assert_eq!(
        parsed,
        ParsedLine::FileChange(ParsedFileChange {
            file_name: "foo.rs".to_string(),
            file_path: "src/foo.rs".to_string(),
            change_type: ChangeType::Created,
        })
    );
}

#[test]
fn classifies_file_edit_and_delete() {
    assert_eq!(
        parse("> Updating src/bar.rs"),
        ParsedLine::FileChange(ParsedFileChange {
            file_name: "bar.rs".to_string(),
            file_path: "src/bar.rs".to_string(),
            change_type: ChangeType::Edited,
        })
    );
    assert_eq!(
        parse("> Removing src/baz.rs"),
        ParsedLine::FileChange(ParsedFileChange {
            file_name: "baz.rs".to_string(),
            file_path: "src/baz.rs".to_string(),
            change_type: ChangeType::Deleted,
        })
    );
}

#[test]
fn rejects_directory_looking_file_change_candidates() {
    // "src/components" has no dot in its last segment -> not a file change.
    assert_eq!(parse("> Creating src/components"), ParsedLine::Output);
}

#[test]
fn classifies_dotfile_changes() {
    assert_eq!(
        parse("> Creating .gitignore"),
        ParsedLine::FileChange(ParsedFileChange {
            file_name: ".gitignore".to_string(),
            file_path: ".gitignore".to_string(),
            change_type: ChangeType::Created,
        })
    );
    assert_eq!(
        parse("> Editing .env"),
        ParsedLine::FileChange(ParsedFileChange {
            file_name: ".env".to_string(),
            file_path: ".env".to_string(),
            change_type: ChangeType::Edited,
        })
    );
}

#[test]
fn classifies_pass_fail_test_lines() {
    assert_eq!(
        parse("PASS src/x.spec.ts"),
        ParsedLine::TestResult(ParsedTestResult::FileLevel {
            file_path: "src/x.spec.ts".to_string(),
            status: TestStatus::Passed,
        })
    );
    assert_eq!(
        parse("FAIL src/y.spec.ts"),
        ParsedLine::TestResult(ParsedTestResult::FileLevel {
            file_path: "src/y.spec.ts".to_string(),
            status: TestStatus::Failed,
        })
    );
}

#[test]
fn strips_ansi_before_matching_test_result() {
    let colored = "\x1b[32mPASS\x1b[0m src/x.spec.ts";
    assert_eq!(
        parse(colored),
        ParsedLine::TestResult(ParsedTestResult::FileLevel {
            file_path: "src/x.spec.ts".to_string(),
            status: TestStatus::Passed,
        })
    );
}

#[test]
fn classifies_summary_line_and_failed_overall_status() {
    let parsed = parse("Tests: 8 passed, 1 skipped, 2 failed, 11 total");
    match parsed {
        ParsedLine::TestResult(ParsedTestResult::Summary(summary)) => {
            assert_eq!(summary.passed, 8);
            assert_eq!(summary.skipped, 1);
            assert_eq!(summary.failed, 2);
            assert_eq!(summary.total, Some(11));
            assert_eq!(summary_overall_status(&summary), TestStatus::Failed);
        }
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn summary_with_zero_failed_is_passed_overall() {
    let parsed = parse("Tests: 5 passed, 5 total");
    match parsed {
        ParsedLine::TestResult(ParsedTestResult::Summary(summary)) => {
            assert_eq!(summary_overall_status(&summary), TestStatus::Passed);
        }
        other => panic!("expected summary, got {other:?}"),
    }
}

#[test]
fn classifies_tap_style_individual_results() {
    assert_eq!(
        parse("ok 1 - renders the button"),
        ParsedLine::TestResult(ParsedTestResult::Individual {
            test_name: "renders the button".to_string(),
            status: TestStatus::Passed,
        })
    );
    assert_eq!(
        parse("not ok 2 - handles click"),
        ParsedLine::TestResult(ParsedTestResult::Individual {
            test_name: "handles click".to_string(),
            status: TestStatus::Failed,
        })
    );
}

#[test]
fn classifies_glyph_style_individual_results() {
    assert_eq!(
        parse("\u{2713} does the thing (12ms)"),
        ParsedLine::TestResult(ParsedTestResult::Individual {
            test_name: "does the thing".to_string(),
            status: TestStatus::Passed,
        })
    );
    assert_eq!(
        parse("\u{2717} breaks"),
        ParsedLine::TestResult(ParsedTestResult::Individual {
            test_name: "breaks".to_string(),
            status: TestStatus::Failed,
        })
    );
}

#[test]
fn classifies_runtime_errors() {
    let parsed = parse("TypeError: Cannot read property 'x' of undefined");
    assert_eq!(
        parsed,
        ParsedLine::Error(ParsedError {
            error_type: "TypeError".to_string(),
            error_code: None,
        })
    );
}

#[test]
fn classifies_typescript_errors() {
    let parsed = parse("error TS2345: Argument of type 'string' is not assignable");
    assert_eq!(
        parsed,
        ParsedLine::Error(ParsedError {
            error_type: "TypeCheckError".to_string(),
            error_code: Some("TS2345".to_string()),
        })
    );
}

#[test]
fn classifies_npm_errors() {
    let parsed = parse("npm ERR! 404 Not Found - GET https://registry.npmjs.org/foo");
    assert_eq!(
        parsed,
        ParsedLine::Error(ParsedError {
            error_type: "PackageManagerError".to_string(),
            error_code: Some("404".to_string()),
        })
    );
}

#[test]
fn falls_through_to_output_otherwise() {
    assert_eq!(parse("just some ordinary log line"), ParsedLine::Output);
}

#[test]
fn parse_is_idempotent_for_output_lines() {
    let line = "just some ordinary log line";
    let first = parse(line);
    assert_eq!(first, ParsedLine::Output);
    // Re-parsing the same content it classified as output yields output again.
    let second = parse(line);
    assert_eq!(first, second);
}

#[test]
fn command_takes_priority_over_other_rules() {
    // Looks like it could be a file change too, but starts with "$ " so
    // command wins per the "first match wins" ordering.
    assert_eq!(parse("$ > Creating foo.rs"), ParsedLine::Command);
}
