// EN: src/cli/handlers/platform.rs

use crate::cli::handlers::commons::HandlerContext;
use anyhow::Result;
use clap::Args;
use colored::*;

/// Arguments of `procshell platform`.
#[derive(Args, Debug, Default)]
pub struct PlatformArgs {
    /// Print the platform as JSON.
    #[arg(long)]
    pub json: bool,
}

/// The handler for `procshell platform`.
pub fn handle(args: PlatformArgs, context: &HandlerContext) -> Result<i32> {
    if args.json {
        println!("{}", serde_json::to_string(&context.platform)?);
    } else {
        println!("{}", context.platform.to_string().cyan().bold());
    }
    Ok(0)
}
