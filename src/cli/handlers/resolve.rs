// EN: src/cli/handlers/resolve.rs

use crate::cli::handlers::commons::HandlerContext;
use anyhow::{Result, anyhow};
use clap::Args;
use colored::*;

/// Arguments of `procshell resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Print the plan as JSON.
    #[arg(long)]
    pub json: bool,
    /// A full command line, split with POSIX shell rules.
    #[arg(long, conflicts_with = "command")]
    pub line: Option<String>,
    /// The command vector to resolve.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// The handler for `procshell resolve`.
pub fn handle(args: ResolveArgs, context: &HandlerContext) -> Result<i32> {
    let command = match &args.line {
        Some(line) => shlex::split(line).ok_or_else(|| anyhow!("Command line could not be parsed: {}", line))?,
        None => args.command,
    };

    let plan = context.resolver().resolve_command(&command)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let mode = if plan.route_through_shell {
            "shell".yellow().bold()
        } else {
            "direct".green().bold()
        };
        println!("[{}] {}", mode, plan.to_string().cyan());
    }
    Ok(0)
}
