// EN: src/system/signal.rs
//! POSIX signal delivery. On non-Unix targets every call reports `Unsupported`.

use crate::{models::TermSignal, system::probe::ProbeFailure};

/// Sends the null signal to `pid` and interprets the outcome as existence evidence.
///
/// `EPERM` means the process exists but belongs to someone else, so it counts as alive.
#[cfg(unix)]
pub(crate) fn probe_exists(pid: i32) -> Result<bool, ProbeFailure> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid), None) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(Errno::EPERM) => {
            log::debug!("Permission denied signaling pid {}; it exists.", pid);
            Ok(true)
        }
        Err(errno) => Err(ProbeFailure::Signal {
            pid,
            source: errno.into(),
        }),
    }
}

/// Delivers SIGTERM or SIGKILL to `pid`.
#[cfg(unix)]
pub(crate) fn send(pid: i32, signal: TermSignal) -> Result<(), ProbeFailure> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let signal = match signal {
        TermSignal::Graceful => Signal::SIGTERM,
        TermSignal::Kill => Signal::SIGKILL,
    };
    log::debug!("Sending {:?} to pid {}", signal, pid);
    kill(Pid::from_raw(pid), signal).map_err(|errno| ProbeFailure::Signal {
        pid,
        source: errno.into(),
    })
}

#[cfg(not(unix))]
pub(crate) fn probe_exists(_pid: i32) -> Result<bool, ProbeFailure> {
    Err(ProbeFailure::Unsupported("Signal-based liveness probing"))
}

#[cfg(not(unix))]
pub(crate) fn send(_pid: i32, _signal: TermSignal) -> Result<(), ProbeFailure> {
    Err(ProbeFailure::Unsupported("Signal delivery"))
}
