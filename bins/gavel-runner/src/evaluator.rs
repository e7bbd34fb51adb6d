/// Output Evaluator - Language-Agnostic Grading Logic
///
/// **Core Responsibility:**
/// Compare raw execution outputs against expected outputs and aggregate the
/// per-fixture outcomes into a report.
///
/// **Critical Properties:**
/// - Knows nothing about processes or command templates
/// - Pure functions: (execution output, expected output) → outcome
///
/// **Normalization Rules (Applied to Both Sides):**
/// - Trim leading/trailing whitespace: YES
/// - CRLF → LF: YES
/// - Collapse whitespace runs to a single space: YES
/// - Strip `[` and `]` and all remaining whitespace: YES
/// - Lowercase: YES
///
/// The normalized form is only an equality test. The stored actual output is
/// the raw trimmed stdout, never the normalized text.
use gavel_common::types::{Report, TestOutcome};
use tracing::debug;

/// Raw output of one fixture run. Produced by the execution engine, consumed
/// here.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    pub index: u32,
    pub stdout: String,
    pub stderr: String,
    pub exit_ok: bool,
    pub timed_out: bool,
    pub duration_ms: f64,
}

/// Canonical form used for output equality.
pub fn normalize(output: &str) -> String {
    let unified = output.trim().replace("\r\n", "\n");

    let mut collapsed = String::with_capacity(unified.len());
    let mut last_was_ws = false;
    for ch in unified.chars() {
        if ch.is_whitespace() {
            if !last_was_ws {
                collapsed.push(' ');
            }
            last_was_ws = true;
        } else {
            collapsed.push(ch);
            last_was_ws = false;
        }
    }

    collapsed
        .chars()
        .filter(|c| *c != '[' && *c != ']' && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

pub fn outputs_match(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

/// Grade one fixture run.
///
/// Priority: a timed-out or non-zero-exit run fails with an empty actual
/// output and the diagnostic text as the error, regardless of anything
/// written to stdout. Otherwise pass/fail is the normalized comparison.
pub fn evaluate_fixture(output: &ExecutionOutput, input: &str, expected: &str) -> TestOutcome {
    if output.timed_out || !output.exit_ok {
        return TestOutcome {
            index: output.index,
            input: input.trim().to_string(),
            expected_output: expected.trim().to_string(),
            actual_output: String::new(),
            passed: false,
            execution_time_ms: output.duration_ms,
            error: Some(output.stderr.clone()),
        };
    }

    let passed = outputs_match(&output.stdout, expected);
    TestOutcome {
        index: output.index,
        input: input.trim().to_string(),
        expected_output: expected.trim().to_string(),
        actual_output: output.stdout.trim().to_string(),
        passed,
        execution_time_ms: output.duration_ms,
        error: None,
    }
}

/// Collect outcomes into a report. Order is preserved; the summary counts are
/// derived by the report itself.
pub fn aggregate(outcomes: Vec<TestOutcome>) -> Report {
    for outcome in &outcomes {
        debug!(
            fixture = outcome.index,
            passed = outcome.passed,
            execution_ms = outcome.execution_time_ms,
            "fixture graded"
        );
    }
    Report::new(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a clean run output
    fn make_output(index: u32, stdout: &str, duration_ms: f64) -> ExecutionOutput {
        ExecutionOutput {
            index,
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_ok: true,
            timed_out: false,
            duration_ms,
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["[1, 2, 3]", "  hello\r\nworld  ", "", "   ", "[ [1], [2] ]"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn normalize_bracket_and_spacing_variants_agree() {
        assert_eq!(normalize("[1, 2, 3]"), normalize("[1,2,3]"));
        assert_eq!(normalize("[1, 2, 3]"), normalize(" [ 1 , 2 , 3 ] "));
    }

    #[test]
    fn normalize_is_case_insensitive() {
        assert_eq!(normalize("True"), normalize("true"));
    }

    #[test]
    fn normalize_unifies_line_endings() {
        assert_eq!(normalize("a\r\nb"), normalize("a\nb"));
    }

    #[test]
    fn exact_match_passes() {
        let outcome = evaluate_fixture(&make_output(1, "120", 42.0), "5", "120");
        assert!(outcome.passed);
        assert_eq!(outcome.index, 1);
        assert_eq!(outcome.actual_output, "120");
        assert_eq!(outcome.execution_time_ms, 42.0);
    }

    #[test]
    fn spacing_differences_still_pass() {
        let outcome = evaluate_fixture(&make_output(1, "[1,2,3]\n", 1.0), "x", "[1, 2, 3]");
        assert!(outcome.passed);
        // Stored output is the raw trimmed stdout, not the normalized form.
        assert_eq!(outcome.actual_output, "[1,2,3]");
    }

    #[test]
    fn mismatch_fails() {
        let outcome = evaluate_fixture(&make_output(1, "wrong", 1.0), "x", "right");
        assert!(!outcome.passed);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn non_zero_exit_fails_with_empty_output() {
        let output = ExecutionOutput {
            index: 2,
            stdout: "partial garbage".to_string(),
            stderr: "Traceback: boom".to_string(),
            exit_ok: false,
            timed_out: false,
            duration_ms: 3.0,
        };
        let outcome = evaluate_fixture(&output, "x", "partial garbage");
        assert!(!outcome.passed);
        assert_eq!(outcome.actual_output, "");
        assert_eq!(outcome.error.as_deref(), Some("Traceback: boom"));
    }

    #[test]
    fn timeout_fails_with_diagnostic() {
        let output = ExecutionOutput {
            index: 1,
            stdout: String::new(),
            stderr: "time limit of 100ms exceeded".to_string(),
            exit_ok: false,
            timed_out: true,
            duration_ms: 101.0,
        };
        let outcome = evaluate_fixture(&output, "x", "y");
        assert!(!outcome.passed);
        assert!(outcome.error.as_deref().unwrap_or("").contains("time limit"));
    }

    #[test]
    fn aggregate_preserves_order() {
        let outcomes = vec![
            evaluate_fixture(&make_output(1, "a", 1.0), "i", "a"),
            evaluate_fixture(&make_output(2, "b", 1.0), "i", "z"),
            evaluate_fixture(&make_output(3, "c", 1.0), "i", "c"),
        ];
        let report = aggregate(outcomes);
        assert_eq!(report.total(), 3);
        assert_eq!(report.passed_count(), 2);
        let indices: Vec<u32> = report.outcomes().iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
