//! # System Interaction Layer
//!
//! Everything that touches the operating system: environment variables, external
//! utilities, signals and the filesystem.
//!
//! ## Modules
//!
//! - **`env`**: the [`env::EnvSource`] seam over environment variables.
//! - **`probe`**: runs external utilities (`which`, `tasklist`, ...) with a hard timeout.
//!   Its [`probe::ProbeFailure`] is what every best-effort component collapses into a default.
//! - **`platform`**: OS classification and the memoized WSL2 detection.
//! - **`liveness`**: "is this pid alive?" via the null signal or `tasklist`.
//! - **`terminate`**: signal delivery, cooperative exit polling and the stop protocol.
//! - **`shell`**: direct vs. shell-routed execution and user shell discovery.

pub mod env;
pub mod liveness;
pub mod platform;
pub mod probe;
pub mod shell;
pub mod terminate;

mod signal;
