// EN: src/system/shell.rs

use crate::{
    constants::{
        COMSPEC_ENV_VAR, GIT_BASH_LOCATIONS, INTERACTIVE_FLAGS, KNOWN_SHELL_NAMES, LEGACY_POWERSHELL_RELATIVE,
        PWSH_EXECUTABLE, SHELL_ENV_VAR, UNIX_FALLBACK_SHELL, UNIX_SHELL_CANDIDATES, WINDOWS_FALLBACK_SHELL,
        WSL2_SHELL_CANDIDATES,
    },
    core::settings::Settings,
    models::{PlatformType, ShellInvocationPlan, ShellKind},
    system::{
        env::EnvSource,
        probe::{self, ProbeFailure},
    },
};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Caller errors rejected by [`ShellResolver::resolve_command`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// The argument shape a shell needs to run one command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationTemplate {
    /// `-c <cmd>`, or `-i -c <cmd>` for interactive sessions.
    PosixCommand,
    /// `-NoLogo -Command <cmd>`.
    PowerShellCommand,
    /// `/C <cmd>`.
    CmdCommand,
}

impl InvocationTemplate {
    /// Picks the template for a platform/shell pair. `None` means the platform is not
    /// recognized and the command should be executed directly.
    pub fn select(platform: PlatformType, shell: ShellKind) -> Option<Self> {
        match (platform, shell) {
            (PlatformType::Windows, ShellKind::Posix) => Some(Self::PosixCommand),
            (PlatformType::Windows, ShellKind::PowerShell) => Some(Self::PowerShellCommand),
            (PlatformType::Windows, ShellKind::Cmd) => Some(Self::CmdCommand),
            (PlatformType::Linux | PlatformType::MacOs | PlatformType::Wsl2, _) => Some(Self::PosixCommand),
            (PlatformType::Other, _) => None,
        }
    }

    /// Builds the shell arguments. Only POSIX shells distinguish interactive sessions.
    pub fn arguments(self, interactive: bool, command_line: String) -> Vec<String> {
        let flags: &[&str] = match self {
            Self::PosixCommand if interactive => &["-i", "-c"],
            Self::PosixCommand => &["-c"],
            Self::PowerShellCommand => &["-NoLogo", "-Command"],
            Self::CmdCommand => &["/C"],
        };
        flags
            .iter()
            .map(|flag| (*flag).to_string())
            .chain(std::iter::once(command_line))
            .collect()
    }
}

/// True when `command` names a known shell (bare or as a path ending in `/<name>`).
fn is_shell_name(command: &str) -> bool {
    KNOWN_SHELL_NAMES.iter().any(|name| {
        command == *name
            || command
                .strip_suffix(name)
                .is_some_and(|prefix| prefix.ends_with('/'))
    })
}

/// A command is an interactive session when it launches a shell with no arguments
/// or with an interactive/login flag. Everything else is a one-shot command.
pub fn is_interactive_session(head: &str, tail: &[String]) -> bool {
    is_shell_name(head) && (tail.is_empty() || tail.iter().any(|arg| INTERACTIVE_FLAGS.contains(&arg.as_str())))
}

/// The parts of the host that Unix shell discovery consults.
pub trait ShellHost: Debug + Send + Sync {
    /// The current user's login shell from the user database, if recorded.
    fn login_shell(&self) -> Option<String>;

    /// True when `path` is a file the current user may execute.
    fn is_executable(&self, path: &Path) -> bool;
}

/// The real host: the system user database and file permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShellHost;

impl ShellHost for SystemShellHost {
    fn login_shell(&self) -> Option<String> {
        login_shell()
    }

    fn is_executable(&self, path: &Path) -> bool {
        is_executable_file(path)
    }
}

/// Decides how to run a command vector and which shell to use when a shell is needed.
#[derive(Debug, Clone)]
pub struct ShellResolver {
    platform: PlatformType,
    env: Arc<dyn EnvSource>,
    host: Arc<dyn ShellHost>,
    lookup_utility: String,
    lookup_timeout: Duration,
    shell_probe_timeout: Duration,
}

impl ShellResolver {
    /// A resolver for `platform` using the real host for shell discovery.
    pub fn new(platform: PlatformType, env: Arc<dyn EnvSource>, settings: &Settings) -> Self {
        let lookup_utility = match platform {
            PlatformType::Windows => "where",
            _ => "which",
        };
        Self {
            platform,
            env,
            host: Arc::new(SystemShellHost),
            lookup_utility: lookup_utility.to_string(),
            lookup_timeout: settings.lookup_timeout(),
            shell_probe_timeout: settings.shell_probe_timeout(),
        }
    }

    /// Replaces the host consulted for the login shell and candidate checks.
    pub fn with_shell_host(mut self, host: Arc<dyn ShellHost>) -> Self {
        self.host = host;
        self
    }

    /// Replaces the search-path lookup utility (`where` / `which` by default).
    pub fn with_lookup_utility(mut self, utility: impl Into<String>) -> Self {
        self.lookup_utility = utility.into();
        self
    }

    /// Produces an invocation plan for `command`.
    ///
    /// Executables found on the search path run directly. Anything else (aliases,
    /// functions, builtins) is routed through the user's shell. When the lookup
    /// itself cannot run, the command is executed directly.
    ///
    /// # Errors
    /// Returns [`ResolveError::InvalidArgument`] for an empty command, before any probing.
    pub fn resolve_command(&self, command: &[String]) -> Result<ShellInvocationPlan, ResolveError> {
        let (head, tail) = command
            .split_first()
            .ok_or(ResolveError::InvalidArgument("command must not be empty"))?;

        let direct = ShellInvocationPlan {
            executable: head.clone(),
            arguments: tail.to_vec(),
            route_through_shell: false,
        };

        match self.lookup_executable(head) {
            Ok(true) => {
                log::debug!("'{}' is on the search path, executing directly.", head);
                return Ok(direct);
            }
            Ok(false) => log::debug!("'{}' is not on the search path.", head),
            Err(failure) => {
                log::debug!("Search path lookup for '{}' failed, executing directly: {}", head, failure);
                return Ok(direct);
            }
        }

        let interactive = is_interactive_session(head, tail);
        let shell = self.get_user_shell();
        let kind = ShellKind::classify(&shell, self.platform);
        let Some(template) = InvocationTemplate::select(self.platform, kind) else {
            log::debug!("No shell template for platform {}, executing '{}' directly.", self.platform, head);
            return Ok(direct);
        };

        let arguments = template.arguments(interactive, command.join(" "));
        log::debug!(
            "Routing '{}' through {} ({}, interactive: {})",
            head,
            shell,
            kind,
            interactive
        );
        Ok(ShellInvocationPlan {
            executable: shell,
            arguments,
            route_through_shell: true,
        })
    }

    /// Finds the user's preferred shell. Always returns something runnable-looking:
    /// the last-resort defaults are `cmd.exe` on Windows and `/bin/sh` elsewhere.
    pub fn get_user_shell(&self) -> String {
        if let Some(shell) = self.env.var(SHELL_ENV_VAR) {
            return shell;
        }
        match self.platform {
            PlatformType::Windows => self.discover_windows_shell(),
            _ => self.discover_unix_shell(),
        }
    }

    /// `Ok(false)` only when the lookup ran to completion and reported a miss.
    fn lookup_executable(&self, name: &str) -> Result<bool, ProbeFailure> {
        probe::run(&self.lookup_utility, &[name], self.lookup_timeout).map(|output| output.status.success())
    }

    fn discover_windows_shell(&self) -> String {
        match probe::run_checked(
            PWSH_EXECUTABLE,
            &["-NoLogo", "-NoProfile", "-Command", "exit"],
            self.shell_probe_timeout,
        ) {
            Ok(_) => return PWSH_EXECUTABLE.to_string(),
            Err(failure) => log::debug!("pwsh unavailable: {}", failure),
        }

        if let Some(system_root) = self.env.var("SystemRoot") {
            let legacy = windows_path(&system_root, LEGACY_POWERSHELL_RELATIVE);
            if legacy.is_file() {
                return legacy.display().to_string();
            }
        }

        let git_bash = GIT_BASH_LOCATIONS.iter().find_map(|(var, relative)| {
            let root = self.env.var(var)?;
            let candidate = windows_path(&root, relative);
            candidate.is_file().then_some(candidate)
        });
        if let Some(bash) = git_bash {
            return bash.display().to_string();
        }

        self.env
            .var(COMSPEC_ENV_VAR)
            .unwrap_or_else(|| WINDOWS_FALLBACK_SHELL.to_string())
    }

    fn discover_unix_shell(&self) -> String {
        if let Some(login_shell) = self.host.login_shell() {
            return login_shell;
        }
        let candidates = match self.platform {
            PlatformType::Wsl2 => WSL2_SHELL_CANDIDATES,
            _ => UNIX_SHELL_CANDIDATES,
        };
        candidates
            .iter()
            .find(|candidate| self.host.is_executable(Path::new(candidate)))
            .map(|candidate| (*candidate).to_string())
            .unwrap_or_else(|| UNIX_FALLBACK_SHELL.to_string())
    }
}

/// Joins a Windows root and a backslash-separated relative path.
fn windows_path(root: &str, relative: &str) -> PathBuf {
    relative.split('\\').fold(PathBuf::from(root), |path, part| path.join(part))
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// The login shell recorded for the current user, when the user database has one.
#[cfg(unix)]
fn login_shell() -> Option<String> {
    use nix::unistd::{Uid, User};
    match User::from_uid(Uid::current()) {
        Ok(Some(user)) => {
            let shell = user.shell.display().to_string();
            (!shell.is_empty()).then_some(shell)
        }
        Ok(None) => None,
        Err(e) => {
            log::debug!("User database lookup failed: {}", e);
            None
        }
    }
}

#[cfg(not(unix))]
fn login_shell() -> Option<String> {
    None
}
