use thiserror::Error;

/// Top-level error type for the `wolhub-api` crate.
///
/// Every failure mode of a request/response cycle lands here:
/// transport failures, malformed payloads, and structured API
/// rejections. `wolhub-core` maps these into user-facing feedback.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-2xx response. `detail` is extracted from a `{detail: …}`
    /// body when the server provided one.
    #[error("API error (HTTP {status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The server-supplied detail message, if one could be extracted.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` for failures below the application layer
    /// (network unreachable, malformed response), which get a generic
    /// notification instead of a server message.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Deserialization { .. })
    }

    /// Returns `true` if this is a "not found" rejection.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
