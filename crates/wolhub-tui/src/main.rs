//! `wolhub-tui` — terminal console for a Wake-on-LAN device registry.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `wolhub_core`'s [`Dispatcher`](wolhub_core::Dispatcher). One screen:
//! the device list, an add form, and wake/delete actions, all gated by
//! the dispatcher's single-flight guard.
//!
//! Logs are written to a file (default `/tmp/wolhub-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task forwards
//! list snapshots and feedback events into the TUI action loop.

mod action;
mod app;
mod data_bridge;
mod event;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use wolhub_core::Dispatcher;

use crate::app::App;

/// Terminal console for waking and managing Wake-on-LAN devices.
#[derive(Parser, Debug)]
#[command(name = "wolhub-tui", version, about)]
struct Cli {
    /// Registry server base URL (e.g., http://192.168.1.10:8000)
    #[arg(short = 's', long, env = "WOLHUB_SERVER")]
    server: Option<String>,

    /// Log file path (defaults to /tmp/wolhub-tui.log)
    #[arg(long, default_value = "/tmp/wolhub-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wolhub={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wolhub-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let cfg = wolhub_config::load_config_or_default();
    let console = wolhub_config::to_console_config(&cfg, cli.server.as_deref())
        .map_err(|e| eyre!("{e}"))?;

    info!(server = %console.server, "starting wolhub-tui");

    let dispatcher = Dispatcher::new(&console).map_err(|e| eyre!("{e}"))?;
    let mut app = App::new(dispatcher, console.feedback);
    app.run().await?;

    Ok(())
}
