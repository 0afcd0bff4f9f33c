//! Locating, building, and spawning the harness binary.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::Limits;

pub fn build_harness_binary(repo_root: &Path) -> Result<PathBuf> {
    let output = Command::new("cargo")
        .arg("build")
        .arg("-p")
        .arg("harness")
        .current_dir(repo_root)
        .output()
        .context("build harness binary")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("harness build failed: {}", stderr.trim());
    }
    Ok(harness_binary_path(repo_root))
}

pub fn harness_binary_path(repo_root: &Path) -> PathBuf {
    let binary = format!("harness{}", std::env::consts::EXE_SUFFIX);
    repo_root.join("target").join("debug").join(binary)
}

/// Use `explicit` when given, otherwise build the workspace harness.
pub fn resolve_harness_binary(repo_root: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => build_harness_binary(repo_root)?,
    };
    if !path.exists() {
        bail!("harness binary not found at {}", path.display());
    }
    Ok(path)
}

/// Captured result of one harness invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
    pub stdout_truncated: bool,
    pub stderr_truncated: bool,
}

/// Run `harness <routine>` once, feeding `stdin` and capturing the output.
///
/// Stdin is written and both output pipes are drained on their own threads
/// while the child runs, so the timeout covers the whole exchange.
pub fn invoke_harness(
    harness_bin: &Path,
    routine: &str,
    stdin: &str,
    limits: Limits,
) -> Result<Invocation> {
    let mut child = Command::new(harness_bin)
        .arg(routine)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {} {}", harness_bin.display(), routine))?;

    let pipe = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let input = stdin.as_bytes().to_vec();
    let stdin_handle = thread::spawn(move || write_stdin(pipe, &input));
    let limit = limits.output_limit_bytes;
    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, limit));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, limit));

    let mut timed_out = false;
    let status: ExitStatus = match child
        .wait_timeout(limits.timeout)
        .context("wait for harness")?
    {
        Some(status) => status,
        None => {
            timed_out = true;
            debug!(routine, "harness timed out, killing");
            child.kill().ok();
            child.wait().context("wait after kill")?
        }
    };

    join_thread(stdin_handle).context("write harness stdin")?;
    let (stdout, stdout_truncated) = join_thread(stdout_handle).context("read stdout")?;
    let (stderr, stderr_truncated) = join_thread(stderr_handle).context("read stderr")?;

    Ok(Invocation {
        exit_code: if timed_out { None } else { status.code() },
        timed_out,
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        stdout_truncated,
        stderr_truncated,
    })
}

fn write_stdin(mut pipe: ChildStdin, input: &[u8]) -> io::Result<()> {
    // The harness stops reading once a routine's shape is satisfied or
    // rejected, and a killed child closes the pipe, so neither is an error.
    match pipe.write_all(input) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Drain `reader` to the end, keeping at most `limit` bytes.
fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> io::Result<(Vec<u8>, bool)> {
    let mut buf = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let keep = n.min(limit.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..keep]);
        truncated |= keep < n;
    }

    Ok((buf, truncated))
}

fn join_thread<T>(handle: thread::JoinHandle<io::Result<T>>) -> Result<T> {
    match handle.join() {
        Ok(result) => Ok(result?),
        Err(_) => Err(anyhow!("harness i/o thread panicked")),
    }
}


#[cfg(all(test, unix))]
mod tests {
    use super::test_support::fake_harness;
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    #[test]
    fn harness_binary_path_is_deterministic() {
        let root = Path::new("/repo/root");
        let path = harness_binary_path(root);
        let expected = format!(
            "/repo/root/target/debug/harness{}",
            std::env::consts::EXE_SUFFIX
        );
        assert_eq!(path, PathBuf::from(expected));
    }

    #[test]
    fn explicit_binary_must_exist() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("missing");
        let err = resolve_harness_binary(temp.path(), Some(&missing)).expect_err("missing");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn captures_routine_arg_stdin_and_exit_code() {
        let temp = tempdir().expect("tempdir");
        let bin = fake_harness(temp.path(), "printf '%s:' \"$1\"; cat; exit 3");
        let invocation =
            invoke_harness(&bin, "twoSum", "1 2", Limits::default_limits()).expect("invoke");
        assert_eq!(invocation.stdout, "twoSum:1 2");
        assert_eq!(invocation.exit_code, Some(3));
        assert!(!invocation.timed_out);
    }

    #[test]
    fn kills_on_timeout() {
        let temp = tempdir().expect("tempdir");
        let bin = fake_harness(temp.path(), "exec sleep 5");
        let limits = Limits {
            timeout: Duration::from_millis(200),
            output_limit_bytes: 1024,
        };
        let invocation = invoke_harness(&bin, "twoSum", "", limits).expect("invoke");
        assert!(invocation.timed_out);
        assert_eq!(invocation.exit_code, None);
    }

    #[test]
    fn truncates_large_output() {
        let temp = tempdir().expect("tempdir");
        let bin = fake_harness(temp.path(), "printf '0123456789'");
        let limits = Limits {
            timeout: Duration::from_secs(5),
            output_limit_bytes: 4,
        };
        let invocation = invoke_harness(&bin, "x", "", limits).expect("invoke");
        assert_eq!(invocation.stdout, "0123");
        assert!(invocation.stdout_truncated);
    }

    #[test]
    fn timeout_holds_when_child_never_reads_stdin() {
        let temp = tempdir().expect("tempdir");
        let bin = fake_harness(temp.path(), "exec sleep 5");
        let limits = Limits {
            timeout: Duration::from_millis(200),
            output_limit_bytes: 1024,
        };
        let stdin = "1 ".repeat(512 * 1024);
        let started = Instant::now();
        let invocation = invoke_harness(&bin, "twoSum", &stdin, limits).expect("invoke");
        assert!(invocation.timed_out);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn drains_output_past_the_limit() {
        let temp = tempdir().expect("tempdir");
        let bin = fake_harness(temp.path(), "head -c 200000 /dev/zero; exit 0");
        let limits = Limits {
            timeout: Duration::from_secs(5),
            output_limit_bytes: 16,
        };
        let invocation = invoke_harness(&bin, "x", "", limits).expect("invoke");
        assert!(!invocation.timed_out);
        assert_eq!(invocation.exit_code, Some(0));
        assert_eq!(invocation.stdout.len(), 16);
        assert!(invocation.stdout_truncated);
    }
}
