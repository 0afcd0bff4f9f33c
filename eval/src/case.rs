//! Case file parsing and validation.
//!
//! A case is a TOML file describing one problem: the harness routine that
//! solves it and the stdin/stdout pairs it must satisfy. See `eval/cases/`
//! for examples.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

/// A parsed case file containing problem metadata, limits, and tests.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseFile {
    pub problem: ProblemMeta,
    #[serde(default)]
    pub config: CaseConfig,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// Problem metadata: identifier and the routine under test.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProblemMeta {
    /// Unique identifier (slug format: `[a-z0-9_-]+`).
    pub id: String,
    /// Harness routine name, passed verbatim as the first argument.
    pub routine: String,
    #[serde(default)]
    pub title: String,
}

/// Per-case overrides of the default execution limits.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CaseConfig {
    /// Wall-clock limit per test, in seconds.
    pub timeout_secs: Option<u64>,
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: Option<usize>,
}

/// One harness invocation and its expected result.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TestCase {
    /// Text piped to the harness on stdin.
    pub stdin: String,
    /// Exact stdout expected (trailing whitespace ignored).
    #[serde(default)]
    pub expected_stdout: String,
    #[serde(default)]
    pub expected_exit: i32,
    /// Hidden tests have their input and expectation redacted in reports.
    #[serde(default)]
    pub hidden: bool,
}

impl CaseFile {
    /// Load and validate a case file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read case {}", path.display()))?;
        let case: CaseFile =
            toml::from_str(&contents).with_context(|| format!("parse case {}", path.display()))?;
        case.validate()
            .with_context(|| format!("validate case {}", path.display()))?;
        Ok(case)
    }

    #[cfg(test)]
    pub fn parse_str(contents: &str) -> Result<Self> {
        let case: CaseFile = toml::from_str(contents).context("parse case")?;
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> Result<()> {
        validate_case_id(&self.problem.id)?;
        let routine = &self.problem.routine;
        if routine.trim().is_empty() {
            bail!("problem.routine must be non-empty");
        }
        // Unknown names are allowed through so a case can assert the
        // harness rejects them, but they must not smuggle in extra args.
        if routine.chars().any(char::is_whitespace) {
            bail!("problem.routine must not contain whitespace");
        }
        if let Some(timeout_secs) = self.config.timeout_secs
            && timeout_secs == 0
        {
            bail!("config.timeout_secs must be > 0");
        }
        if let Some(limit) = self.config.output_limit_bytes
            && limit == 0
        {
            bail!("config.output_limit_bytes must be > 0");
        }
        if self.tests.is_empty() {
            bail!("tests must be a non-empty array");
        }
        for (index, test) in self.tests.iter().enumerate() {
            if !(0..=255).contains(&test.expected_exit) {
                bail!("tests[{}].expected_exit must be within 0..=255", index);
            }
        }
        Ok(())
    }

    /// Whether the routine is one the linked harness registers.
    pub fn routine_is_registered(&self) -> bool {
        harness::registry::lookup(&self.problem.routine).is_some()
    }
}

/// Discover and load all case files from a directory.
///
/// Returns cases sorted by id. Errors if duplicate ids are found.
pub fn discover_cases(dir: &Path) -> Result<Vec<CaseFile>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut cases = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read cases dir {}", dir.display()))? {
        let entry = entry.context("read case entry")?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            continue;
        }
        cases.push(CaseFile::load(&path)?);
    }
    cases.sort_by(|left, right| left.problem.id.cmp(&right.problem.id));
    for pair in cases.windows(2) {
        if pair[0].problem.id == pair[1].problem.id {
            return Err(anyhow!("duplicate problem.id {}", pair[0].problem.id));
        }
    }
    Ok(cases)
}

/// Case ids double as file and directory names, so they are slugs.
pub(crate) fn validate_case_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        bail!("problem.id must be non-empty");
    }
    if id.contains('/') || id.contains('\\') {
        bail!("problem.id must not contain path separators");
    }
    if id.contains("..") {
        bail!("problem.id must not contain '..'");
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
    {
        bail!("problem.id must use [a-z0-9_-] only");
    }
    Ok(())
}
