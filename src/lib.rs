//! Cross-platform process and shell resolution.
//!
//! - [`system::platform`] classifies the host, including WSL2, and memoizes the probe.
//! - [`system::liveness`] answers whether a pid is alive.
//! - [`system::terminate`] delivers termination requests and waits for exits.
//! - [`system::shell`] decides between direct and shell-routed execution.
//!
//! ```no_run
//! use procshell::{core::settings::Settings, system::{platform, terminate::Terminator}};
//!
//! # async fn stop_server(pid: i32) {
//! let terminator = Terminator::new(platform::detect_platform(), &Settings::default());
//! let outcome = terminator.stop(pid).await;
//! println!("{:?}", outcome);
//! # }
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

#[cfg(test)]
mod test_support;
