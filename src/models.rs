// EN: src/models.rs

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The operating environment as far as process and shell handling is concerned.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformType {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Linux,
    /// Linux running inside a WSL2 virtual machine on a Windows host.
    #[serde(rename = "linux-in-windows-vm")]
    Wsl2,
    /// A target that is none of the above (BSDs, illumos, ...).
    Other,
}

impl PlatformType {
    /// True for every platform where processes are addressed with POSIX signals.
    pub fn is_unix_like(self) -> bool {
        !matches!(self, Self::Windows)
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
            Self::Wsl2 => "linux-in-windows-vm",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// The native OS kind as reported by the build target, before any virtualization probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl OsKind {
    /// The OS this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }
}

/// The memoized outcome of WSL2 detection. `Unknown` is represented by an empty cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VirtualizationState {
    ConfirmedVm2,
    NotVm2,
}

/// How a shell expects to be handed a command string.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ShellKind {
    /// bash, zsh, sh and friends (including Git Bash on Windows).
    Posix,
    /// `pwsh` or Windows PowerShell.
    #[serde(rename = "powershell")]
    PowerShell,
    /// `cmd.exe`.
    Cmd,
}

impl ShellKind {
    /// Classifies a discovered shell. Only Windows distinguishes shell families;
    /// every Unix-like platform is driven with POSIX flags.
    pub fn classify(shell: &str, platform: PlatformType) -> Self {
        if platform != PlatformType::Windows {
            return Self::Posix;
        }
        // `Path` does not split on backslashes off Windows, so normalize first.
        let normalized = shell.replace('\\', "/");
        let stem = Path::new(&normalized)
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match stem.as_str() {
            "pwsh" | "powershell" => Self::PowerShell,
            "cmd" => Self::Cmd,
            _ => Self::Posix,
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Posix => "posix",
            Self::PowerShell => "powershell",
            Self::Cmd => "cmd",
        };
        f.write_str(name)
    }
}

/// The termination request sent to a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermSignal {
    /// SIGTERM on Unix-like platforms.
    #[default]
    Graceful,
    /// SIGKILL on Unix-like platforms.
    Kill,
}

/// Final state reported by the composite stop protocol.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StopOutcome {
    /// Nothing was running under that pid.
    NotRunning,
    /// The process exited after the graceful signal.
    Graceful,
    /// The process exited only after the forced kill.
    Forced,
    /// The process survived both signals within the allotted budgets.
    StillRunning,
}

impl StopOutcome {
    /// True when the process is gone.
    pub fn is_stopped(self) -> bool {
        !matches!(self, Self::StillRunning)
    }
}

/// How to execute a command: directly, or routed through a shell.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocationPlan {
    /// The program to spawn.
    pub executable: String,
    /// Arguments passed to `executable`, in order.
    pub arguments: Vec<String>,
    /// True when `executable` is a shell running the original command.
    pub route_through_shell: bool,
}

impl ShellInvocationPlan {
    /// Builds a blocking `std::process::Command` for this plan.
    pub fn to_command(&self) -> std::process::Command {
        let mut command = std::process::Command::new(&self.executable);
        command.args(&self.arguments);
        command
    }

    /// Builds an async `tokio::process::Command` for this plan.
    pub fn to_async_command(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.executable);
        command.args(&self.arguments);
        command
    }
}

impl fmt::Display for ShellInvocationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = std::iter::once(self.executable.as_str()).chain(self.arguments.iter().map(String::as_str));
        // Quoting is for display only; the plan itself carries discrete arguments.
        match shlex::try_join(parts) {
            Ok(line) => f.write_str(&line),
            Err(_) => write!(f, "{} {}", self.executable, self.arguments.join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_windows_shells() {
        let win = PlatformType::Windows;
        assert_eq!(ShellKind::classify("pwsh", win), ShellKind::PowerShell);
        assert_eq!(
            ShellKind::classify(r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe", win),
            ShellKind::PowerShell
        );
        assert_eq!(ShellKind::classify(r"C:\Windows\system32\CMD.EXE", win), ShellKind::Cmd);
        assert_eq!(ShellKind::classify(r"C:\Program Files\Git\bin\bash.exe", win), ShellKind::Posix);
    }

    #[test]
    fn test_classify_is_posix_off_windows() {
        assert_eq!(ShellKind::classify("pwsh", PlatformType::Linux), ShellKind::Posix);
        assert_eq!(ShellKind::classify("cmd", PlatformType::Wsl2), ShellKind::Posix);
    }

    #[test]
    fn test_platform_display_names() {
        assert_eq!(PlatformType::Wsl2.to_string(), "linux-in-windows-vm");
        assert_eq!(PlatformType::MacOs.to_string(), "macos");
        assert!(PlatformType::Wsl2.is_unix_like());
        assert!(!PlatformType::Windows.is_unix_like());
    }

    #[test]
    fn test_plan_display_quotes_arguments() {
        let plan = ShellInvocationPlan {
            executable: "/bin/bash".to_string(),
            arguments: vec!["-c".to_string(), "ll -a".to_string()],
            route_through_shell: true,
        };
        let line = plan.to_string();
        assert!(line.starts_with("/bin/bash -c "));
        assert_eq!(shlex::split(&line).unwrap(), vec!["/bin/bash", "-c", "ll -a"]);
    }
}
