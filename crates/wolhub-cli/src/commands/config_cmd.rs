//! Config subcommand handlers.

use dialoguer::{Input, Select};

use wolhub_config::{self as config, Config};
use wolhub_core::{FeedbackChannel, IdentityKey};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, _global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::Config(Box::new(e.into())))?;
            print!("{rendered}");
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("wolhub — configuration wizard");
            eprintln!("  Config path: {}\n", config_path.display());

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default("http://192.168.1.10:8000".into())
                .interact_text()
                .map_err(prompt_err)?;

            if server.parse::<url::Url>().is_err() {
                return Err(CliError::Validation {
                    field: "server".into(),
                    reason: format!("invalid URL: {server}"),
                });
            }

            let identity_choices = &["MAC address (recommended)", "Name"];
            let identity_selection = Select::new()
                .with_prompt("Identify devices by")
                .items(identity_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let feedback_choices = &["Toast notifications", "Blocking dialogs"];
            let feedback_selection = Select::new()
                .with_prompt("Feedback style (TUI)")
                .items(feedback_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let cfg = Config {
                server: Some(server),
                identity_key: if identity_selection == 0 {
                    IdentityKey::MacAddress
                } else {
                    IdentityKey::Name
                },
                feedback: if feedback_selection == 0 {
                    FeedbackChannel::Toast
                } else {
                    FeedbackChannel::Dialog
                },
                ..Config::default()
            };

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Test it: wolhub devices list");
            Ok(())
        }
    }
}
