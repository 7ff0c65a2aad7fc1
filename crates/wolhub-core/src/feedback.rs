// ── View-facing state and feedback events ──
//
// The dispatcher publishes two things: the device list snapshot
// (a watch channel of `ListView`, replaced wholesale on every
// successful refresh) and a stream of `Feedback` events (operation
// lifecycle + notifications) that the view layer turns into spinners,
// toasts, or dialogs.

use std::time::{Duration, Instant};

use crate::model::Device;

/// How long a notification stays fully visible.
pub const NOTIFICATION_VISIBLE: Duration = Duration::from_secs(3);

/// Fade-out span after the visible window, before removal.
pub const NOTIFICATION_FADE: Duration = Duration::from_millis(300);

// ── Intents ──────────────────────────────────────────────────────────

/// The four user-triggered operations the dispatcher gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Add,
    Wake,
    Remove,
    Refresh,
}

// ── Device list snapshot ─────────────────────────────────────────────

/// The rendered list always equals the most recently fetched server
/// snapshot, or an explicit placeholder state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListView {
    /// No refresh has completed yet.
    #[default]
    Loading,
    /// Last successful snapshot, in server order. May be empty.
    Loaded(Vec<Device>),
    /// Last refresh failed; shown inline until the next success.
    Failed(String),
}

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// Where a notification is in its fixed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visible,
    Fading,
    Expired,
}

/// An ephemeral notification. Each one is independently timed; there
/// is no deduplication and re-renders never reset the clock.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub posted_at: Instant,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            posted_at: Instant::now(),
        }
    }

    /// Lifecycle phase at `now`: visible for 3s, fading for 300ms,
    /// then expired (the view removes it).
    pub fn phase(&self, now: Instant) -> Phase {
        let age = now.saturating_duration_since(self.posted_at);
        if age < NOTIFICATION_VISIBLE {
            Phase::Visible
        } else if age < NOTIFICATION_VISIBLE + NOTIFICATION_FADE {
            Phase::Fading
        } else {
            Phase::Expired
        }
    }
}

// ── Feedback events ──────────────────────────────────────────────────

/// Events broadcast from the dispatcher to the view layer.
#[derive(Debug, Clone)]
pub enum Feedback {
    /// The guard was acquired; the originating affordance should show
    /// a loading state.
    OpStarted(Intent),
    /// The guard was released (success or failure); affordances are
    /// restored.
    OpFinished(Intent),
    /// A notification to display.
    Notify(Notification),
    /// A create succeeded; the input form should be reset.
    ClearForm,
}

// ── Tests ────────────────────────────────────────────────────────────
