// EN: src/cli/handlers/mod.rs

// One module per CLI action.

pub mod commons;
pub mod platform;
pub mod resolve;
pub mod shell;
pub mod status;
pub mod stop;
