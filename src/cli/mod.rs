// EN: src/cli/mod.rs

use clap::{Parser, Subcommand};

pub mod dispatcher;
pub mod handlers;

/// procshell: process liveness, termination and shell resolution for Windows, macOS, Linux and WSL2.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The procshell actions.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the detected platform.
    Platform(handlers::platform::PlatformArgs),
    /// Reports whether a process is running (exit code 1 when it is not).
    Status(handlers::status::StatusArgs),
    /// Stops a process: graceful signal, bounded wait, then a forced kill.
    Stop(handlers::stop::StopArgs),
    /// Shows how a command would be executed (directly or through a shell).
    Resolve(handlers::resolve::ResolveArgs),
    /// Prints the user's preferred shell.
    Shell(handlers::shell::ShellArgs),
}
