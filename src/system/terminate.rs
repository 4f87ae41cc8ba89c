// EN: src/system/terminate.rs

use crate::{
    core::settings::Settings,
    models::{PlatformType, StopOutcome, TermSignal},
    system::{
        liveness::LivenessChecker,
        probe::{self, ProbeFailure},
        signal,
    },
};
use std::time::{Duration, Instant};

/// Sends termination requests and waits, cooperatively, for processes to go away.
#[derive(Debug, Clone)]
pub struct Terminator {
    liveness: LivenessChecker,
    probe_timeout: Duration,
    poll_interval: Duration,
    graceful_budget: Duration,
    forced_budget: Duration,
}

impl Terminator {
    /// A terminator for `platform` with probe, poll and stop budgets taken from `settings`.
    pub fn new(platform: PlatformType, settings: &Settings) -> Self {
        Self {
            liveness: LivenessChecker::new(platform, settings),
            probe_timeout: settings.probe_timeout(),
            poll_interval: settings.poll_interval(),
            graceful_budget: settings.graceful_stop_timeout(),
            forced_budget: settings.forced_stop_timeout(),
        }
    }

    /// The liveness checker used between polls.
    pub fn liveness(&self) -> &LivenessChecker {
        &self.liveness
    }

    /// Asks `pid` to terminate. Returns whether the request was *delivered*,
    /// not whether the process has exited.
    pub fn terminate(&self, pid: i32, signal: TermSignal) -> bool {
        if pid <= 0 {
            return false;
        }
        let delivered = match self.liveness.platform() {
            PlatformType::Windows => self.taskkill(pid),
            _ => signal::send(pid, signal),
        };
        match delivered {
            Ok(()) => true,
            Err(failure) => {
                log::debug!("Could not deliver {:?} to pid {}: {}", signal, pid, failure);
                false
            }
        }
    }

    /// Polls liveness until `pid` is gone (`true`) or `timeout` has elapsed (`false`).
    ///
    /// The task sleeps between polls, so other tasks keep running. A process that
    /// is already gone returns `true` before any sleep, even with a zero timeout.
    pub async fn wait_for_exit(&self, pid: i32, timeout: Duration) -> bool {
        let started = Instant::now();
        loop {
            if !self.liveness.is_running(pid) {
                return true;
            }
            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return false;
            }
            // Never oversleep the deadline.
            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }

    /// Graceful signal, bounded wait, then forced kill with a shorter wait.
    pub async fn stop(&self, pid: i32) -> StopOutcome {
        self.stop_with_budgets(pid, self.graceful_budget, self.forced_budget)
            .await
    }

    /// [`Terminator::stop`] with explicit wait budgets.
    pub async fn stop_with_budgets(&self, pid: i32, graceful_budget: Duration, forced_budget: Duration) -> StopOutcome {
        if !self.liveness.is_running(pid) {
            return StopOutcome::NotRunning;
        }

        log::debug!("Stopping pid {} (graceful budget {:?})", pid, graceful_budget);
        if self.terminate(pid, TermSignal::Graceful) && self.wait_for_exit(pid, graceful_budget).await {
            return StopOutcome::Graceful;
        }

        log::warn!(
            "Process {} did not exit within {:?} after a graceful request; forcing it.",
            pid,
            graceful_budget
        );
        self.terminate(pid, TermSignal::Kill);
        if self.wait_for_exit(pid, forced_budget).await {
            StopOutcome::Forced
        } else {
            log::warn!("Process {} is still running after a forced kill.", pid);
            StopOutcome::StillRunning
        }
    }

    fn taskkill(&self, pid: i32) -> Result<(), ProbeFailure> {
        let pid_arg = pid.to_string();
        probe::run_checked("taskkill", &["/PID", &pid_arg, "/F"], self.probe_timeout).map(|_| ())
    }
}
