// EN: src/cli/handlers/commons.rs

// Shared setup used by every handler.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::{
    core::settings::Settings,
    models::PlatformType,
    system::{
        env::{EnvSource, ProcessEnv},
        platform::PlatformDetector,
        shell::ShellResolver,
        terminate::Terminator,
    },
};

/// Everything a handler needs, built once per invocation from the real host.
#[derive(Debug)]
pub struct HandlerContext {
    /// The detected platform.
    pub platform: PlatformType,
    /// Loaded settings, or the defaults.
    pub settings: Settings,
    /// Environment variable source.
    pub env: Arc<dyn EnvSource>,
}

impl HandlerContext {
    /// Detects the platform and loads settings from the environment/config directory.
    pub fn from_host() -> Result<Self> {
        let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);
        let settings = Settings::load(&*env).context("Failed to load procshell settings")?;
        let platform = PlatformDetector::shared().detect_platform();
        Ok(Self { platform, settings, env })
    }

    pub fn terminator(&self) -> Terminator {
        Terminator::new(self.platform, &self.settings)
    }

    pub fn resolver(&self) -> ShellResolver {
        ShellResolver::new(self.platform, Arc::clone(&self.env), &self.settings)
    }
}
