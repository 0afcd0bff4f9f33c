//! CLI command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::case::{CaseFile, discover_cases, validate_case_id};
use crate::judge::TestOutcome;
use crate::report::aggregate;
use crate::results::read_report;
use crate::run::{RunOptions, run_case};

fn cases_dir(repo_root: &Path) -> PathBuf {
    repo_root.join("eval").join("cases")
}

fn results_dir(repo_root: &Path, case_id: &str) -> PathBuf {
    repo_root.join("eval").join("results").join(case_id)
}

/// List all available cases.
pub fn list_cases(repo_root: &Path) -> Result<()> {
    let cases = discover_cases(&cases_dir(repo_root))?;
    for case in cases {
        println!(
            "{}\t{}\t{}",
            case.problem.id, case.problem.routine, case.problem.title
        );
    }
    Ok(())
}

/// Run every test of a case once; fails if any test failed.
pub fn run_case_by_id(repo_root: &Path, case_id: &str, options: &RunOptions) -> Result<()> {
    validate_case_id(case_id).context("invalid case id")?;
    let case_path = cases_dir(repo_root).join(format!("{case_id}.toml"));
    if !case_path.exists() {
        bail!("case {} not found at {}", case_id, case_path.display());
    }
    let case = CaseFile::load(&case_path).context("load case")?;
    debug!(case_id, tests = case.tests.len(), "case loaded");

    info!(case_id, "starting run");
    let outcome = run_case(repo_root, &case_path, &case, options).context("run case")?;
    let report = read_report(&outcome.report_path)?;
    for result in &report.results {
        println!("{}", describe(result));
    }
    println!(
        "run: case={} eval_run_id={} total={} passed={} failed={} report={}",
        case_id,
        outcome.eval_run_id,
        outcome.summary.total,
        outcome.summary.passed,
        outcome.summary.failed,
        outcome.report_path.display()
    );
    if outcome.summary.failed > 0 {
        bail!(
            "{} of {} tests failed",
            outcome.summary.failed,
            outcome.summary.total
        );
    }
    Ok(())
}

/// Show aggregated results for a case.
pub fn report_case(repo_root: &Path, case_id: &str) -> Result<()> {
    validate_case_id(case_id).context("invalid case id")?;
    let (summary, warnings) = aggregate(&results_dir(repo_root, case_id))?;
    println!(
        "report: case={} runs={} clean_runs={}",
        case_id, summary.runs, summary.clean_runs
    );
    println!(
        "report: tests total={} passed={} failed={}",
        summary.tests_total, summary.tests_passed, summary.tests_failed
    );
    if let Some(avg) = summary.avg_duration_secs {
        println!("report: avg_duration_secs={:.2}", avg);
    }
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

/// Remove persisted reports for a case.
pub fn clean_case(repo_root: &Path, case_id: &str) -> Result<()> {
    validate_case_id(case_id).context("invalid case id")?;
    let case_results = results_dir(repo_root, case_id);
    if case_results.exists() {
        std::fs::remove_dir_all(&case_results)
            .with_context(|| format!("remove {}", case_results.display()))?;
    }
    println!(
        "clean: case={} results={}",
        case_id,
        case_results.display()
    );
    Ok(())
}

fn describe(result: &TestOutcome) -> String {
    let status = if result.passed { "pass" } else { "FAIL" };
    let mut line = format!(
        "test {}: {} exit={:?} stdout={:?}",
        result.test_id, status, result.exit_code, result.actual_stdout
    );
    if !result.passed {
        line.push_str(&format!(
            " expected_exit={} expected_stdout={:?} input={:?}",
            result.expected_exit, result.expected_stdout, result.input
        ));
    }
    if result.timed_out {
        line.push_str(" timed_out");
    }
    if result.output_truncated {
        line.push_str(" truncated");
    }
    line
}
