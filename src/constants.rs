// EN: src/constants.rs

/// Kernel identity text consulted for WSL detection (Linux only).
pub const KERNEL_IDENTITY_PATH: &str = "/proc/version";

/// Lower-cased marker present in the kernel identity of any WSL generation.
pub const WSL_VENDOR_MARKER: &str = "microsoft";

/// Lower-cased marker present only in the kernel identity of WSL2.
pub const WSL2_VERSION_MARKER: &str = "wsl2";

/// Environment variables exported inside both WSL generations.
pub const WSL_ENV_MARKERS: &[&str] = &["WSL_DISTRO_NAME", "WSL_INTEROP", "WSLENV"];

/// The user's preferred shell. Authoritative when set.
pub const SHELL_ENV_VAR: &str = "SHELL";

/// Names recognized as shells when classifying a command as an interactive session.
pub const KNOWN_SHELL_NAMES: &[&str] = &["bash", "zsh", "sh", "fish", "ksh", "dash", "tcsh", "csh"];

/// Arguments that turn a shell invocation into an interactive or login session.
pub const INTERACTIVE_FLAGS: &[&str] = &["-i", "--interactive", "-l", "--login"];

/// Unix shell candidates when running under WSL2 (bash first).
pub const WSL2_SHELL_CANDIDATES: &[&str] = &["/bin/bash", "/usr/bin/bash", "/bin/zsh", "/usr/bin/zsh"];

/// Unix shell candidates everywhere else (zsh first).
pub const UNIX_SHELL_CANDIDATES: &[&str] = &["/bin/zsh", "/usr/bin/zsh", "/bin/bash", "/usr/bin/bash"];

/// Last-resort shell on Unix-like systems.
pub const UNIX_FALLBACK_SHELL: &str = "/bin/sh";

/// Cross-platform PowerShell executable.
pub const PWSH_EXECUTABLE: &str = "pwsh";

/// Legacy Windows PowerShell, relative to `%SystemRoot%`.
pub const LEGACY_POWERSHELL_RELATIVE: &str = r"System32\WindowsPowerShell\v1.0\powershell.exe";

/// Git-for-Windows bash locations as `(environment variable, relative path)` pairs.
pub const GIT_BASH_LOCATIONS: &[(&str, &str)] = &[
    ("ProgramFiles", r"Git\bin\bash.exe"),
    ("ProgramFiles(x86)", r"Git\bin\bash.exe"),
    ("LOCALAPPDATA", r"Programs\Git\bin\bash.exe"),
];

/// The configured Windows command interpreter.
pub const COMSPEC_ENV_VAR: &str = "COMSPEC";

/// Last-resort Windows command interpreter.
pub const WINDOWS_FALLBACK_SHELL: &str = "cmd.exe";

/// Overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "PROCSHELL_CONFIG";

/// Name of the settings file inside the procshell config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

// Default timings, in milliseconds. Probe timeouts must stay well below the stop budgets.
/// Default for `tasklist`/`taskkill` runs.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;
/// Default for `which`/`where`.
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;
/// Default for checking that a candidate shell starts.
pub const DEFAULT_SHELL_PROBE_TIMEOUT_MS: u64 = 1_500;
/// Default sleep between liveness polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
/// Default wait after the graceful signal.
pub const DEFAULT_GRACEFUL_STOP_TIMEOUT_MS: u64 = 5_000;
/// Default wait after the forced kill.
pub const DEFAULT_FORCED_STOP_TIMEOUT_MS: u64 = 2_000;
