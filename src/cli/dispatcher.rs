// EN: src/cli/dispatcher.rs

use anyhow::Result;

use crate::cli::{Commands, handlers};

/// Routes a parsed command to its handler and returns the process exit code.
pub async fn dispatch(command: Commands) -> Result<i32> {
    log::debug!("Dispatching: {:?}", command);
    let context = handlers::commons::HandlerContext::from_host()?;

    match command {
        Commands::Platform(args) => handlers::platform::handle(args, &context),
        Commands::Status(args) => handlers::status::handle(args, &context),
        Commands::Stop(args) => handlers::stop::handle(args, &context).await,
        Commands::Resolve(args) => handlers::resolve::handle(args, &context),
        Commands::Shell(args) => handlers::shell::handle(args, &context),
    }
}
