//! Test execution and outcome recording.
//!
//! Runs every test of a case through the harness, one process per test,
//! and compares exit code and stdout against the expectation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::binary::{Invocation, invoke_harness};
use crate::case::{CaseFile, TestCase};
use crate::config::Limits;

/// Placeholder for the input and expectation of hidden tests.
pub const REDACTED: &str = "<hidden>";

/// Result of running a single test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestOutcome {
    /// 1-based position in the case file.
    pub test_id: usize,
    pub passed: bool,
    pub hidden: bool,
    pub input: String,
    pub expected_stdout: String,
    pub expected_exit: i32,
    pub actual_stdout: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    /// Captured stdout or stderr hit the output limit.
    pub output_truncated: bool,
    /// Harness stderr, when it wrote any.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[TestOutcome]) -> Self {
        let passed = outcomes.iter().filter(|outcome| outcome.passed).count();
        Self {
            total: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
        }
    }
}

/// Collected test outcomes for one case run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Judgment {
    pub results: Vec<TestOutcome>,
    pub summary: Summary,
}

/// Run all tests of `case` against `harness_bin`.
#[instrument(skip_all, fields(routine = %case.problem.routine, test_count = case.tests.len()))]
pub fn run_tests(harness_bin: &Path, case: &CaseFile, limits: Limits) -> Result<Judgment> {
    let mut results = Vec::with_capacity(case.tests.len());
    for (index, test) in case.tests.iter().enumerate() {
        let test_id = index + 1;
        let invocation = invoke_harness(harness_bin, &case.problem.routine, &test.stdin, limits)
            .with_context(|| format!("run test {test_id}"))?;
        if invocation.timed_out {
            warn!(test_id, "test timed out");
        }
        let outcome = test_outcome(test_id, test, &invocation);
        debug!(test_id, passed = outcome.passed, exit_code = ?outcome.exit_code, "test result");
        results.push(outcome);
    }
    let summary = Summary::from_outcomes(&results);
    Ok(Judgment { results, summary })
}

/// Whether `invocation` meets `test`'s expectation.
///
/// Trailing whitespace on stdout is not significant.
pub fn passes(test: &TestCase, invocation: &Invocation) -> bool {
    !invocation.timed_out
        && invocation.exit_code == Some(test.expected_exit)
        && invocation.stdout.trim_end() == test.expected_stdout.trim_end()
}

fn test_outcome(test_id: usize, test: &TestCase, invocation: &Invocation) -> TestOutcome {
    let (input, expected_stdout) = if test.hidden {
        (REDACTED.to_string(), REDACTED.to_string())
    } else {
        (test.stdin.clone(), test.expected_stdout.clone())
    };
    let stderr = invocation.stderr.trim();
    TestOutcome {
        test_id,
        passed: passes(test, invocation),
        hidden: test.hidden,
        input,
        expected_stdout,
        expected_exit: test.expected_exit,
        actual_stdout: invocation.stdout.clone(),
        exit_code: invocation.exit_code,
        timed_out: invocation.timed_out,
        output_truncated: invocation.stdout_truncated || invocation.stderr_truncated,
        error: (!stderr.is_empty()).then(|| stderr.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_case(stdin: &str, expected_stdout: &str, expected_exit: i32) -> TestCase {
        TestCase {
            stdin: stdin.to_string(),
            expected_stdout: expected_stdout.to_string(),
            expected_exit,
            hidden: false,
        }
    }

    fn invocation(stdout: &str, exit_code: Option<i32>) -> Invocation {
        Invocation {
            exit_code,
            timed_out: false,
            stdout: stdout.to_string(),
            stderr: String::new(),
            stdout_truncated: false,
            stderr_truncated: false,
        }
    }

    #[test]
    fn passes_on_matching_stdout_and_exit() {
        let test = test_case("121", "true", 0);
        assert!(passes(&test, &invocation("true", Some(0))));
        assert!(passes(&test, &invocation("true\n", Some(0))));
    }

    #[test]
    fn fails_on_stdout_mismatch() {
        let test = test_case("121", "true", 0);
        assert!(!passes(&test, &invocation("false", Some(0))));
        assert!(!passes(&test, &invocation(" true", Some(0))));
    }

    #[test]
    fn fails_on_exit_mismatch() {
        let test = test_case("2\n1", "", 1);
        assert!(passes(&test, &invocation("", Some(1))));
        assert!(!passes(&test, &invocation("", Some(0))));
        assert!(!passes(&test, &invocation("", None)));
    }

    #[test]
    fn timeout_never_passes() {
        let test = test_case("1", "", 0);
        let mut timed_out = invocation("", Some(0));
        timed_out.timed_out = true;
        assert!(!passes(&test, &timed_out));
    }

    #[test]
    fn hidden_outcome_is_redacted() {
        let mut test = test_case("4\n2 7 11 15\n9", "[0,1]", 0);
        test.hidden = true;
        let mut run = invocation("[0,1]", Some(0));
        run.stderr = "  \n".to_string();
        let outcome = test_outcome(2, &test, &run);
        assert!(outcome.passed);
        assert_eq!(outcome.test_id, 2);
        assert_eq!(outcome.input, REDACTED);
        assert_eq!(outcome.expected_stdout, REDACTED);
        assert_eq!(outcome.actual_stdout, "[0,1]");
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn summary_counts_add_up() {
        let test = test_case("1", "true", 0);
        let outcomes = vec![
            test_outcome(1, &test, &invocation("true", Some(0))),
            test_outcome(2, &test, &invocation("false", Some(0))),
            test_outcome(3, &test, &invocation("", Some(1))),
        ];
        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            Summary {
                total: 3,
                passed: 1,
                failed: 2,
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_tests_drives_each_test_through_the_binary() {
        use crate::binary::test_support::fake_harness;
        use crate::case::{CaseConfig, ProblemMeta};

        let temp = tempfile::tempdir().expect("tempdir");
        // Echoes stdin back, and fails when stdin is empty.
        let bin = fake_harness(
            temp.path(),
            "input=$(cat); [ -z \"$input\" ] && exit 1; printf '%s' \"$input\"",
        );
        let case = CaseFile {
            problem: ProblemMeta {
                id: "echo".to_string(),
                routine: "echo".to_string(),
                title: String::new(),
            },
            config: CaseConfig::default(),
            tests: vec![
                test_case("true", "true", 0),
                test_case("false", "true", 0),
                test_case("", "", 1),
            ],
        };

        let judgment = run_tests(&bin, &case, Limits::default_limits()).expect("run");
        let passed: Vec<bool> = judgment.results.iter().map(|r| r.passed).collect();
        assert_eq!(passed, vec![true, false, true]);
        assert_eq!(judgment.summary.failed, 1);
    }
}
