// ── Console configuration ──
//
// Resolved configuration for one console instance. Construction and
// file/env layering live in wolhub-config; this is the type the
// dispatcher actually consumes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::IdentityKey;

/// How feedback reaches the user: a transient toast stack, or a
/// blocking dialog that must be dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackChannel {
    #[default]
    Toast,
    Dialog,
}

/// Resolved configuration for the operation orchestrator.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Registry server base URL.
    pub server: Url,
    /// Which device field keys wake/delete requests.
    pub identity: IdentityKey,
    /// Toast-style or blocking-dialog feedback.
    pub feedback: FeedbackChannel,
    /// Transport timeout; the client enforces nothing beyond this.
    pub timeout: Duration,
}

impl ConsoleConfig {
    /// Config with defaults for everything but the server URL.
    pub fn new(server: Url) -> Self {
        Self {
            server,
            identity: IdentityKey::default(),
            feedback: FeedbackChannel::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
