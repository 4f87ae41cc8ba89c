// EN: src/cli/handlers/stop.rs

use crate::{cli::handlers::commons::HandlerContext, models::StopOutcome};
use anyhow::Result;
use clap::Args;
use colored::*;
use std::time::Duration;

/// Arguments of `procshell stop`.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// The process id to stop.
    #[arg(allow_negative_numbers = true)]
    pub pid: i32,
    /// How long to wait after the graceful signal (defaults to the configured budget).
    #[arg(long, value_name = "MS")]
    pub graceful_timeout_ms: Option<u64>,
    /// How long to wait after the forced kill (defaults to the configured budget).
    #[arg(long, value_name = "MS")]
    pub forced_timeout_ms: Option<u64>,
}

/// The handler for `procshell stop <pid>`.
pub async fn handle(args: StopArgs, context: &HandlerContext) -> Result<i32> {
    let graceful = args
        .graceful_timeout_ms
        .map_or_else(|| context.settings.graceful_stop_timeout(), Duration::from_millis);
    let forced = args
        .forced_timeout_ms
        .map_or_else(|| context.settings.forced_stop_timeout(), Duration::from_millis);

    let outcome = context
        .terminator()
        .stop_with_budgets(args.pid, graceful, forced)
        .await;

    let pid = args.pid.to_string().yellow();
    match outcome {
        StopOutcome::NotRunning => println!("Process {} was {}.", pid, "not running".dimmed()),
        StopOutcome::Graceful => println!("Process {} {}.", pid, "stopped".green().bold()),
        StopOutcome::Forced => println!("Process {} {} after a forced kill.", pid, "stopped".yellow().bold()),
        StopOutcome::StillRunning => println!("Process {} is {}.", pid, "still running".red().bold()),
    }
    Ok(if outcome.is_stopped() { 0 } else { 1 })
}
