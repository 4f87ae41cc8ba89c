// EN: src/system/liveness.rs

use crate::{
    core::settings::Settings,
    models::PlatformType,
    system::{
        probe::{self, ProbeFailure},
        signal,
    },
};
use std::time::Duration;

/// Answers "is this pid alive?" with the platform's own mechanism.
#[derive(Debug, Clone)]
pub struct LivenessChecker {
    platform: PlatformType,
    probe_timeout: Duration,
}

impl LivenessChecker {
    /// A checker for `platform`, bounding external probes by the configured probe timeout.
    pub fn new(platform: PlatformType, settings: &Settings) -> Self {
        Self {
            platform,
            probe_timeout: settings.probe_timeout(),
        }
    }

    /// The platform whose mechanism this checker uses.
    pub fn platform(&self) -> PlatformType {
        self.platform
    }

    /// Returns whether `pid` refers to an existing process. Never fails.
    ///
    /// Non-positive pids are never probed. Any probe failure reads as "not running".
    pub fn is_running(&self, pid: i32) -> bool {
        if pid <= 0 {
            return false;
        }
        let probed = match self.platform {
            PlatformType::Windows => self.query_tasklist(pid),
            _ => signal::probe_exists(pid),
        };
        probed.unwrap_or_else(|failure| {
            match &failure {
                ProbeFailure::Signal { .. } => log::warn!("Unexpected error probing pid {}: {}", pid, failure),
                _ => log::debug!("Liveness probe for pid {} failed: {}", pid, failure),
            }
            false
        })
    }

    fn query_tasklist(&self, pid: i32) -> Result<bool, ProbeFailure> {
        let filter = format!("PID eq {}", pid);
        let output = probe::run_checked(
            "tasklist",
            &["/FI", &filter, "/FO", "CSV", "/NH"],
            self.probe_timeout,
        )?;
        Ok(tasklist_lists_pid(&output.stdout, pid))
    }
}

/// Scans `tasklist /FO CSV /NH` output for a row whose PID column is exactly `pid`.
///
/// Rows look like `"node.exe","1234","Console","1","10,000 K"`. When nothing
/// matches, `tasklist` prints an `INFO:` line instead, which never parses as a row.
pub(crate) fn tasklist_lists_pid(stdout: &str, pid: i32) -> bool {
    let wanted = pid.to_string();
    stdout.lines().any(|line| {
        let line = line.trim();
        let Some(inner) = line.strip_prefix('"').and_then(|l| l.strip_suffix('"')) else {
            return false;
        };
        inner.split("\",\"").nth(1) == Some(wanted.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> LivenessChecker {
        let platform = if cfg!(windows) { PlatformType::Windows } else { PlatformType::Linux };
        LivenessChecker::new(platform, &Settings::default())
    }

    #[test]
    fn test_non_positive_pids_are_not_running() {
        // On Windows these would need `tasklist`; on Unix `kill(0, 0)` would succeed.
        // Both must short-circuit instead.
        let checker = checker();
        assert!(!checker.is_running(0));
        assert!(!checker.is_running(-1));
        assert!(!checker.is_running(i32::MIN));
    }

    #[test]
    fn test_tasklist_pid_matching_is_exact() {
        let output = "\"node.exe\",\"212\",\"Console\",\"1\",\"10,000 K\"\r\n";
        assert!(tasklist_lists_pid(output, 212));
        assert!(!tasklist_lists_pid(output, 12));
        assert!(!tasklist_lists_pid(output, 21));
        // The memory column contains "10" before the comma; it must not count.
        assert!(!tasklist_lists_pid(output, 10));
    }

    #[test]
    fn test_tasklist_no_match_message() {
        let output = "INFO: No tasks are running which match the specified criteria.\r\n";
        assert!(!tasklist_lists_pid(output, 1234));
        assert!(!tasklist_lists_pid("", 1234));
    }

    #[cfg(unix)]
    #[test]
    fn test_current_process_is_running() {
        let pid = i32::try_from(std::process::id()).unwrap();
        assert!(checker().is_running(pid));
    }

    #[cfg(unix)]
    #[test]
    fn test_reaped_child_is_not_running() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = i32::try_from(child.id()).unwrap();
        child.wait().unwrap();
        assert!(!checker().is_running(pid));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_foreign_process_counts_as_running() {
        // pid 1 belongs to root: unprivileged callers get EPERM, root gets success.
        assert!(checker().is_running(1));
    }
}
