// EN: src/system/probe.rs

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often a running probe is checked for completion.
const PROBE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Why a best-effort probe could not produce an answer.
///
/// Probe failures never reach callers of the public components: each component
/// collapses them into its conservative default.
#[derive(Error, Debug)]
pub enum ProbeFailure {
    #[error("Probe '{program}' could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Probe '{program}' did not finish within {timeout:?}.")]
    TimedOut { program: String, timeout: Duration },
    #[error("Probe '{program}' exited with status {status}.")]
    NonZeroExit { program: String, status: ExitStatus },
    #[error("Could not wait on probe '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Signal delivery to pid {pid} failed: {source}")]
    Signal {
        pid: i32,
        #[source]
        source: io::Error,
    },
    #[error("Could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} is not supported on this platform.")]
    Unsupported(&'static str),
}

/// Captured result of a probe that ran to completion.
#[derive(Debug)]
pub struct ProbeOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

/// Runs an external utility synchronously, killing it if it outlives `timeout`.
///
/// The child gets a null stdin and a discarded stderr; stdout is captured and
/// decoded lossily. A non-zero exit is *not* an error here, see [`run_checked`].
pub fn run(program: &str, args: &[&str], timeout: Duration) -> Result<ProbeOutput, ProbeFailure> {
    log::debug!("Probing: {} {:?} (timeout {:?})", program, args, timeout);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ProbeFailure::Spawn {
            program: program.to_string(),
            source,
        })?;

    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    log::debug!("Probe '{}' (PID: {}) timed out, killing it.", program, child.id());
                    if let Err(e) = child.kill() {
                        log::warn!("Failed to kill timed-out probe {}: {}", child.id(), e);
                    }
                    child.wait().ok();
                    return Err(ProbeFailure::TimedOut {
                        program: program.to_string(),
                        timeout,
                    });
                }
                std::thread::sleep(PROBE_POLL_INTERVAL);
            }
            Err(source) => {
                return Err(ProbeFailure::Wait {
                    program: program.to_string(),
                    source,
                });
            }
        }
    }

    let output = child.wait_with_output().map_err(|source| ProbeFailure::Wait {
        program: program.to_string(),
        source,
    })?;
    Ok(ProbeOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Like [`run`], but a non-zero exit status is reported as a failure.
pub fn run_checked(program: &str, args: &[&str], timeout: Duration) -> Result<ProbeOutput, ProbeFailure> {
    let output = run(program, args, timeout)?;
    if !output.status.success() {
        return Err(ProbeFailure::NonZeroExit {
            program: program.to_string(),
            status: output.status,
        });
    }
    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_stdout() {
        let output = run("echo", &["hello"], Duration::from_secs(5)).unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_run_checked_rejects_non_zero_exit() {
        let result = run_checked("false", &[], Duration::from_secs(5));
        assert!(matches!(result, Err(ProbeFailure::NonZeroExit { .. })));
    }

    #[test]
    fn test_run_times_out_and_kills() {
        let started = Instant::now();
        let result = run("sleep", &["10"], Duration::from_millis(200));
        assert!(matches!(result, Err(ProbeFailure::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_run_reports_missing_program() {
        let result = run("procshell-definitely-not-a-real-program", &[], Duration::from_secs(1));
        assert!(matches!(result, Err(ProbeFailure::Spawn { .. })));
    }
}
