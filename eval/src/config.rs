//! Execution limit merging.
//!
//! Applies case-specific overrides, then command-line overrides, to the
//! default per-test limits.

use std::time::Duration;

use anyhow::{Result, bail};

use crate::case::CaseConfig;

/// Limits for a single harness invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum time before killing the harness.
    pub timeout: Duration,
    /// Maximum bytes to capture from stdout/stderr.
    pub output_limit_bytes: usize,
}

impl Limits {
    /// Default limits: 10s timeout, 64KB output.
    pub fn default_limits() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            output_limit_bytes: 64 * 1024,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            bail!("timeout must be > 0");
        }
        if self.output_limit_bytes == 0 {
            bail!("output_limit_bytes must be > 0");
        }
        Ok(())
    }
}

/// Apply case overrides, then an optional command-line timeout, to `base`.
pub fn apply_case_config(
    mut base: Limits,
    overrides: &CaseConfig,
    cli_timeout_secs: Option<u64>,
) -> Result<Limits> {
    if let Some(timeout_secs) = overrides.timeout_secs {
        base.timeout = Duration::from_secs(timeout_secs);
    }
    if let Some(limit) = overrides.output_limit_bytes {
        base.output_limit_bytes = limit;
    }
    if let Some(timeout_secs) = cli_timeout_secs {
        base.timeout = Duration::from_secs(timeout_secs);
    }
    base.validate()?;
    Ok(base)
}
