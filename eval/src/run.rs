//! Case execution orchestration.
//!
//! Coordinates harness resolution, test execution, and report capture.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};
use tracing::{debug, info, instrument, warn};

use crate::binary::resolve_harness_binary;
use crate::case::CaseFile;
use crate::config::{Limits, apply_case_config};
use crate::judge::{Summary, run_tests};
use crate::results::{ReportInput, build_report, write_report};

/// Command-line knobs for a case run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Prebuilt harness to use instead of building the workspace one.
    pub harness_bin: Option<PathBuf>,
    /// Per-test timeout override, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Result of running a single case.
#[derive(Debug)]
pub struct RunOutcome {
    /// Unique identifier for this eval run.
    pub eval_run_id: String,
    /// Path to the persisted report.
    pub report_path: PathBuf,
    pub summary: Summary,
}

/// Run a case end-to-end: resolve harness, run tests, write the report.
#[instrument(skip_all, fields(problem_id = %case.problem.id))]
pub fn run_case(
    repo_root: &Path,
    case_path: &Path,
    case: &CaseFile,
    options: &RunOptions,
) -> Result<RunOutcome> {
    info!("case run started");

    let limits = apply_case_config(Limits::default_limits(), &case.config, options.timeout_secs)?;

    debug!("resolving harness binary");
    let harness_bin = resolve_harness_binary(repo_root, options.harness_bin.as_deref())?;
    if !case.routine_is_registered() {
        warn!(routine = %case.problem.routine, "routine is not registered in this harness");
    }

    let started_at = Utc::now();
    let eval_run_id = generate_run_id();

    let judgment = run_tests(&harness_bin, case, limits).context("run tests")?;
    let finished_at = Utc::now();

    let input = ReportInput {
        problem_id: &case.problem.id,
        routine: &case.problem.routine,
        case_path,
        eval_run_id: &eval_run_id,
        harness_binary: &harness_bin,
        started_at,
        finished_at,
        repo_root,
    };
    let report = build_report(&input, judgment);
    let summary = report.summary;
    let report_path = write_report(&repo_root.join("eval").join("results"), &report)
        .context("write report")?;

    info!(
        passed = summary.passed,
        failed = summary.failed,
        report = %report_path.display(),
        "case run complete"
    );

    Ok(RunOutcome {
        eval_run_id,
        report_path,
        summary,
    })
}

/// `eval-<timestamp>-<suffix>`; the suffix keeps runs within one second apart.
fn generate_run_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("eval-{}-{}", Utc::now().format("%Y%m%d_%H%M%S"), suffix)
}
