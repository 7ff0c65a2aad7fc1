//! All possible UI actions. Actions are the sole mechanism for state
//! mutation.

use std::fmt;

use wolhub_core::{Feedback, ListView};

/// Pending confirmation action.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    DeleteDevice { identifier: String, name: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteDevice { name, .. } => {
                write!(f, "Delete {name}? This cannot be undone.")
            }
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Device list ────────────────────────────────────────────────
    SelectPrev,
    SelectNext,
    Refresh,

    // ── Intents ────────────────────────────────────────────────────
    RequestWake,
    SubmitAdd,

    // ── Add form ───────────────────────────────────────────────────
    OpenForm,
    CloseForm,
    FormNextField,
    FormPrevField,

    // ── Confirm popup ──────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Dialog-mode feedback ───────────────────────────────────────
    DismissDialog,

    // ── Data events (from the dispatcher) ──────────────────────────
    ListUpdated(ListView),
    FeedbackReceived(Feedback),
}
