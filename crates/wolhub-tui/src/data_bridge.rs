//! Data bridge — connects [`Dispatcher`] channels to TUI actions.
//!
//! Runs as a background task: watches the device list snapshot and the
//! feedback event stream, forwarding every change as an [`Action`]
//! through the TUI's action channel.

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use wolhub_core::Dispatcher;

use crate::action::Action;

/// Spawn the data bridge connecting the dispatcher's reactive channels
/// to the TUI.
///
/// Pushes the current list snapshot immediately, then loops forwarding
/// every snapshot replacement and feedback event. Shuts down cleanly on
/// cancellation.
pub async fn spawn_data_bridge(
    dispatcher: Dispatcher,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut list = dispatcher.list_view();
    let mut feedback = dispatcher.feedback();

    // Push the initial snapshot so the screen has a state immediately
    let _ = action_tx.send(Action::ListUpdated(list.borrow_and_update().clone()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = list.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = list.borrow_and_update().clone();
                let _ = action_tx.send(Action::ListUpdated(snapshot));
            }

            event = feedback.recv() => {
                match event {
                    Ok(ev) => {
                        let _ = action_tx.send(Action::FeedbackReceived(ev));
                    }
                    Err(RecvError::Lagged(missed)) => {
                        warn!(missed, "feedback receiver lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    debug!("data bridge shut down");
}
