// EN: src/cli/handlers/status.rs

use crate::cli::handlers::commons::HandlerContext;
use anyhow::Result;
use clap::Args;
use colored::*;

/// Arguments of `procshell status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// The process id to check.
    #[arg(allow_negative_numbers = true)]
    pub pid: i32,
}

/// The handler for `procshell status <pid>`.
pub fn handle(args: StatusArgs, context: &HandlerContext) -> Result<i32> {
    let running = context.terminator().liveness().is_running(args.pid);
    if running {
        println!("Process {} is {}.", args.pid.to_string().yellow(), "running".green().bold());
        Ok(0)
    } else {
        println!("Process {} is {}.", args.pid.to_string().yellow(), "not running".red().bold());
        Ok(1)
    }
}
