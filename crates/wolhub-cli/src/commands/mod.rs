//! Command dispatch: bridges CLI args to dispatcher intents and output.

pub mod config_cmd;
pub mod devices;
pub mod util;
pub mod wake;

use wolhub_core::Dispatcher;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dispatcher: &Dispatcher,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(dispatcher, args, global).await,
        Command::Wake { identifier } => wake::handle(dispatcher, &identifier, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
