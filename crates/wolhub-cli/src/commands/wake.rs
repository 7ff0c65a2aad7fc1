//! Wake command handler.

use indicatif::{ProgressBar, ProgressStyle};

use wolhub_core::{Dispatcher, NotificationLevel};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(
    dispatcher: &Dispatcher,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = if global.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Waking '{identifier}'..."));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    };

    let mut fb = dispatcher.feedback();
    let outcome = dispatcher.wake(identifier).await;
    let notes = util::drain_notifications(&mut fb);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if !outcome.succeeded() {
        return Err(util::failure(outcome, &notes));
    }

    // The server's receipt message, word for word.
    if let Some(note) = notes
        .iter()
        .find(|n| n.level == NotificationLevel::Success)
    {
        println!("{}", note.message);
    }
    Ok(())
}
