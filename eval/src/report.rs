use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::results::read_report;

#[derive(Debug, Default, PartialEq)]
pub struct ReportSummary {
    pub runs: usize,
    /// Runs in which every test passed.
    pub clean_runs: usize,
    pub tests_total: usize,
    pub tests_passed: usize,
    pub tests_failed: usize,
    pub avg_duration_secs: Option<f64>,
}

pub fn load_report_paths(case_results_dir: &Path) -> Result<Vec<PathBuf>> {
    if !case_results_dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(case_results_dir)
        .with_context(|| format!("read {}", case_results_dir.display()))?
    {
        let entry = entry.context("read entry")?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn aggregate(case_results_dir: &Path) -> Result<(ReportSummary, Vec<String>)> {
    let mut summary = ReportSummary::default();
    let mut warnings = Vec::new();

    for path in load_report_paths(case_results_dir)? {
        let report = match read_report(&path) {
            Ok(report) => report,
            Err(err) => {
                warnings.push(format!("skip {}: report invalid ({err:#})", path.display()));
                continue;
            }
        };

        summary.runs += 1;
        if report.summary.failed == 0 {
            summary.clean_runs += 1;
        }
        summary.tests_total += report.summary.total;
        summary.tests_passed += report.summary.passed;
        summary.tests_failed += report.summary.failed;

        summary.avg_duration_secs = Some(match summary.avg_duration_secs {
            None => report.duration_secs,
            Some(avg) => {
                let total = avg * (summary.runs as f64 - 1.0) + report.duration_secs;
                total / summary.runs as f64
            }
        });
    }

    Ok((summary, warnings))
}
