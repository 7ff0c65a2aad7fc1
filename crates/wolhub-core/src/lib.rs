// wolhub-core: Orchestration layer between wolhub-api and consumers (CLI/TUI).

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod feedback;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, FeedbackChannel};
pub use dispatcher::{Dispatch, Dispatcher};
pub use error::CoreError;
pub use feedback::{Feedback, Intent, ListView, Notification, NotificationLevel, Phase};
pub use model::{DEFAULT_WAKE_PORT, Device, DeviceForm, IdentityKey, LIMITED_BROADCAST};
