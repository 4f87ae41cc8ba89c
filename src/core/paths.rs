// EN: src/core/paths.rs

use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILENAME};
use crate::system::env::EnvSource;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref PROCSHELL_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors locating procshell's configuration files.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the path to the procshell configuration directory (`~/.config/procshell`).
///
/// Memoized: the first call computes and caches the path. The directory is never
/// created, procshell only reads from it.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock only means another thread panicked mid-lookup; the cached value is still a plain path.
    let mut cached_path_guard = PROCSHELL_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("procshell");

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the settings file to load, if any.
///
/// `PROCSHELL_CONFIG` wins; otherwise `config.toml` inside the config directory.
pub fn get_settings_path(env: &dyn EnvSource) -> Result<PathBuf, PathError> {
    if let Some(explicit) = env.var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(explicit));
    }
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}
