//! Shared helpers for command handlers.

use tokio::sync::broadcast;

use wolhub_core::{Dispatch, Feedback, Notification, NotificationLevel};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Drain the notifications a completed operation left on the feedback
/// channel.
pub fn drain_notifications(rx: &mut broadcast::Receiver<Feedback>) -> Vec<Notification> {
    let mut notes = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        if let Feedback::Notify(note) = ev {
            notes.push(note);
        }
    }
    notes
}

/// Turn a failed dispatch into a `CliError` carrying the notification
/// text the operation produced (the server's detail when it sent one).
pub fn failure(outcome: Dispatch, notes: &[Notification]) -> CliError {
    if outcome.was_dropped() {
        // Cannot happen in a one-shot invocation.
        return CliError::Operation {
            message: "another operation is already in flight".into(),
        };
    }
    let message = notes
        .iter()
        .rev()
        .find(|n| n.level == NotificationLevel::Error)
        .map_or_else(|| "operation failed".into(), |n| n.message.clone());
    CliError::Operation { message }
}
