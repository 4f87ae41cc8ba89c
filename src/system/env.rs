// EN: src/system/env.rs

use std::collections::HashMap;
use std::fmt::Debug;

/// Read-only access to environment variables.
///
/// Detection and shell discovery read the environment through this trait so they
/// can be driven by a fixed map instead of the live process environment.
pub trait EnvSource: Debug + Send + Sync {
    /// Returns the value of `key`, treating empty values as unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}
