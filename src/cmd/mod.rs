//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to [`run`] or
//! [`validate`]. A bare `isoserve` invocation starts the server with
//! the top-level flags, same as `isoserve run`.

pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::IsoserveError;

pub async fn dispatch(cli: Cli) -> Result<(), IsoserveError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        None => run::execute(cli.run).await,
    }
}
