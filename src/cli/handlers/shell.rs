// EN: src/cli/handlers/shell.rs

use crate::{cli::handlers::commons::HandlerContext, models::ShellKind};
use anyhow::Result;
use clap::Args;
use colored::*;

/// `procshell shell` takes no arguments.
#[derive(Args, Debug, Default)]
pub struct ShellArgs {}

/// The handler for `procshell shell`.
pub fn handle(_args: ShellArgs, context: &HandlerContext) -> Result<i32> {
    let shell = context.resolver().get_user_shell();
    let kind = ShellKind::classify(&shell, context.platform);
    println!("{} ({})", shell.cyan().bold(), kind.to_string().dimmed());
    Ok(0)
}
