//! Validation report persistence.
//!
//! Each case run writes one JSON report under
//! `eval/results/<problem_id>/<eval_run_id>.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::judge::{Judgment, Summary, TestOutcome};

/// Everything known about one case run, persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub problem_id: String,
    pub routine: String,
    pub eval_run_id: String,
    /// SHA-256 hash of the case file for reproducibility tracking.
    pub case_hash: String,
    /// Git SHA of the workspace at time of run.
    pub git_sha: Option<String>,
    pub harness_binary: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_secs: f64,
    pub results: Vec<TestOutcome>,
    pub summary: Summary,
    /// Non-fatal errors encountered while assembling the report.
    pub errors: Vec<String>,
}

/// Input for building a report from a finished run.
#[derive(Debug)]
pub struct ReportInput<'a> {
    pub problem_id: &'a str,
    pub routine: &'a str,
    pub case_path: &'a Path,
    pub eval_run_id: &'a str,
    pub harness_binary: &'a Path,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub repo_root: &'a Path,
}

/// Assemble the report. Hash and git lookups are best-effort.
pub fn build_report(input: &ReportInput<'_>, judgment: Judgment) -> ValidationReport {
    let mut errors = Vec::new();

    let case_hash = match file_sha256(input.case_path) {
        Ok(hash) => hash,
        Err(err) => {
            errors.push(format!("case hash: {err}"));
            String::new()
        }
    };

    let git_sha = match git_rev_parse(input.repo_root) {
        Ok(sha) => Some(sha),
        Err(err) => {
            errors.push(format!("git sha: {err}"));
            None
        }
    };

    if !errors.is_empty() {
        warn!(errors = ?errors, "report metadata had errors");
    }

    let duration = input.finished_at - input.started_at;
    ValidationReport {
        problem_id: input.problem_id.to_string(),
        routine: input.routine.to_string(),
        eval_run_id: input.eval_run_id.to_string(),
        case_hash,
        git_sha,
        harness_binary: input.harness_binary.display().to_string(),
        start_time: input.started_at.to_rfc3339(),
        end_time: input.finished_at.to_rfc3339(),
        duration_secs: duration.num_milliseconds() as f64 / 1000.0,
        results: judgment.results,
        summary: judgment.summary,
        errors,
    }
}

pub fn report_path(base_dir: &Path, problem_id: &str, eval_run_id: &str) -> PathBuf {
    base_dir.join(problem_id).join(format!("{eval_run_id}.json"))
}

/// Write `report` under `base_dir` and return its path.
pub fn write_report(base_dir: &Path, report: &ValidationReport) -> Result<PathBuf> {
    let path = report_path(base_dir, &report.problem_id, &report.eval_run_id);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create results dir {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(&path, format!("{contents}\n"))
        .with_context(|| format!("write report {}", path.display()))?;
    debug!(path = %path.display(), "report written");
    Ok(path)
}

pub fn read_report(path: &Path) -> Result<ValidationReport> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
}

fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}

fn git_rev_parse(repo_root: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_root)
        .output()
        .context("git rev-parse")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("git rev-parse failed: {}", stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
