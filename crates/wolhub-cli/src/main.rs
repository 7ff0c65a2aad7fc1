mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wolhub_core::Dispatcher;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never need a server connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "wolhub", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the registry server
        cmd => {
            let console_config = build_console_config(&cli.global)?;
            let dispatcher = Dispatcher::new(&console_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &dispatcher, &cli.global).await
        }
    }
}

/// Build a `ConsoleConfig` from the config file and CLI overrides.
fn build_console_config(
    global: &cli::GlobalOpts,
) -> Result<wolhub_core::ConsoleConfig, CliError> {
    let cfg = wolhub_config::load_config_or_default();
    let mut console = wolhub_config::to_console_config(&cfg, global.server.as_deref())?;

    if let Some(identity) = global.identity_key {
        console.identity = identity.into();
    }
    if let Some(seconds) = global.timeout {
        console.timeout = std::time::Duration::from_secs(seconds);
    }

    Ok(console)
}
