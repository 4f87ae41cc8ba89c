// EN: src/core/settings.rs

use crate::{
    constants::{
        DEFAULT_FORCED_STOP_TIMEOUT_MS, DEFAULT_GRACEFUL_STOP_TIMEOUT_MS, DEFAULT_LOOKUP_TIMEOUT_MS,
        DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROBE_TIMEOUT_MS, DEFAULT_SHELL_PROBE_TIMEOUT_MS,
    },
    core::paths,
    system::env::EnvSource,
};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};
use thiserror::Error;

/// Errors raised while loading or validating the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Tunable timings, all in milliseconds.
///
/// Every field is optional in the TOML file; missing fields keep their defaults.
///
/// ```toml
/// probe_timeout_ms = 3000
/// poll_interval_ms = 100
/// graceful_stop_timeout_ms = 8000
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Timeout for `tasklist`/`taskkill`.
    pub probe_timeout_ms: u64,
    /// Timeout for `which`/`where`.
    pub lookup_timeout_ms: u64,
    /// Timeout for checking that a candidate shell starts.
    pub shell_probe_timeout_ms: u64,
    /// Interval between liveness polls while waiting for an exit.
    pub poll_interval_ms: u64,
    /// Budget for the process to exit after the graceful signal.
    pub graceful_stop_timeout_ms: u64,
    /// Budget for the process to exit after the forced kill.
    pub forced_stop_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            shell_probe_timeout_ms: DEFAULT_SHELL_PROBE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            graceful_stop_timeout_ms: DEFAULT_GRACEFUL_STOP_TIMEOUT_MS,
            forced_stop_timeout_ms: DEFAULT_FORCED_STOP_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Loads settings from `$PROCSHELL_CONFIG` or the config directory.
    /// A missing file yields the defaults; nothing is ever written.
    pub fn load(env: &dyn EnvSource) -> Result<Self, SettingsError> {
        let path = match paths::get_settings_path(env) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("No config directory ({}), using default settings.", e);
                return Ok(Self::default());
            }
        };
        Self::load_from(&path)
    }

    /// Loads settings from a specific file, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::debug!("Settings file '{}' not found, using defaults.", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!("Loaded settings from '{}': {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the poll interval is non-zero and probes stay shorter than the stop budget.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.poll_interval_ms == 0 {
            return Err(SettingsError::Invalid("poll_interval_ms must be greater than zero".to_string()));
        }
        let probes = [
            ("probe_timeout_ms", self.probe_timeout_ms),
            ("lookup_timeout_ms", self.lookup_timeout_ms),
            ("shell_probe_timeout_ms", self.shell_probe_timeout_ms),
        ];
        for (name, value) in probes {
            if value == 0 {
                return Err(SettingsError::Invalid(format!("{} must be greater than zero", name)));
            }
            if value >= self.graceful_stop_timeout_ms {
                return Err(SettingsError::Invalid(format!(
                    "{} ({}) must be shorter than graceful_stop_timeout_ms ({})",
                    name, value, self.graceful_stop_timeout_ms
                )));
            }
        }
        Ok(())
    }

    /// Timeout for `tasklist`/`taskkill` runs.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Timeout for the search-path lookup.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Timeout for checking that a candidate shell starts.
    pub fn shell_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.shell_probe_timeout_ms)
    }

    /// Sleep between liveness polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait budget after the graceful signal.
    pub fn graceful_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.graceful_stop_timeout_ms)
    }

    /// Wait budget after the forced kill.
    pub fn forced_stop_timeout(&self) -> Duration {
        Duration::from_millis(self.forced_stop_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml_str("graceful_stop_timeout_ms = 8000\n").unwrap();
        assert_eq!(settings.graceful_stop_timeout_ms, 8000);
        assert_eq!(settings.forced_stop_timeout_ms, DEFAULT_FORCED_STOP_TIMEOUT_MS);
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let result = Settings::from_toml_str("poll_interval_ms = 0\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_probe_longer_than_stop_budget() {
        let result = Settings::from_toml_str("probe_timeout_ms = 6000\n");
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = Settings::from_toml_str("poll_intervall_ms = 50\n");
        assert!(matches!(result, Err(SettingsError::TomlParse(_))));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"poll_interval_ms = 50\nforced_stop_timeout_ms = 1000\n").unwrap();
        file.flush().unwrap();
        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.poll_interval_ms, 50);
        assert_eq!(settings.forced_stop_timeout_ms, 1000);
    }
}
