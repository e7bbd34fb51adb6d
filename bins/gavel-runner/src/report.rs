/// Markdown rendering of a run report.
use gavel_common::types::Report;

pub fn render_markdown(report: &Report) -> String {
    let mut out = String::from("# Test Results\n\n");
    out.push_str(&format!(
        "**Summary:** {}/{} tests passed\n\n",
        report.passed_count(),
        report.total()
    ));

    for outcome in report.outcomes() {
        out.push_str(&format!("### Test Case {}\n", outcome.index));
        out.push_str(&format!(
            "**Status:** {}\n",
            if outcome.passed {
                "✅ Passed"
            } else {
                "❌ Failed"
            }
        ));
        out.push_str(&format!(
            "**Execution Time:** {:.2}ms\n\n",
            outcome.execution_time_ms
        ));

        out.push_str(&format!("**Input:**\n```\n{}\n```\n\n", outcome.input));
        out.push_str(&format!(
            "**Expected Output:**\n```\n{}\n```\n\n",
            outcome.expected_output
        ));

        if !outcome.passed {
            let actual = if outcome.actual_output.is_empty() {
                "N/A"
            } else {
                outcome.actual_output.as_str()
            };
            out.push_str(&format!("**Actual Output:**\n```\n{}\n```\n\n", actual));
            if let Some(error) = &outcome.error {
                if !error.trim().is_empty() {
                    out.push_str(&format!("**Error:**\n```\n{}\n```\n\n", error.trim_end()));
                }
            }
        }

        out.push_str("---\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_common::types::TestOutcome;

    fn make_outcome(index: u32, passed: bool, error: Option<&str>) -> TestOutcome {
        TestOutcome {
            index,
            input: "[1,2,3]".into(),
            expected_output: "[1,2,3]".into(),
            actual_output: if passed { "[1,2,3]".into() } else { String::new() },
            passed,
            execution_time_ms: 12.5,
            error: error.map(|e| e.to_string()),
        }
    }

    #[test]
    fn summary_counts_passed_over_total() {
        let report = Report::new(vec![make_outcome(1, true, None), make_outcome(2, false, None)]);
        let md = render_markdown(&report);
        assert!(md.contains("**Summary:** 1/2 tests passed"));
        assert!(md.contains("### Test Case 1"));
        assert!(md.contains("### Test Case 2"));
    }

    #[test]
    fn timing_has_two_decimals() {
        let report = Report::new(vec![make_outcome(1, true, None)]);
        assert!(render_markdown(&report).contains("**Execution Time:** 12.50ms"));
    }

    #[test]
    fn failures_show_actual_output_and_error() {
        let report = Report::new(vec![make_outcome(1, false, Some("Traceback: boom"))]);
        let md = render_markdown(&report);
        assert!(md.contains("**Actual Output:**\n```\nN/A\n```"));
        assert!(md.contains("**Error:**\n```\nTraceback: boom\n```"));
    }

    #[test]
    fn passes_omit_actual_output_section() {
        let report = Report::new(vec![make_outcome(1, true, None)]);
        assert!(!render_markdown(&report).contains("**Actual Output:**"));
    }
}
