// EN: src/bin/procshell.rs

use clap::Parser;
use colored::*;
use procshell::cli::{Cli, dispatcher};

/// The main entry point of the `procshell` binary.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    match dispatcher::dispatch(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // --- Centralized Error Handling ---
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}
