// ── Core error types ──
//
// User-facing errors from wolhub-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<wolhub_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Cannot reach server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Operation rejected by server: {message}")]
    Rejected { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wolhub_api::Error> for CoreError {
    fn from(err: wolhub_api::Error) -> Self {
        match err {
            wolhub_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::OperationFailed {
                        message: e.to_string(),
                    }
                }
            }
            wolhub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            wolhub_api::Error::Api { status: 404, detail } => CoreError::DeviceNotFound {
                identifier: detail.unwrap_or_else(|| "unknown".into()),
            },
            wolhub_api::Error::Api { status, detail } => CoreError::Rejected {
                message: detail.unwrap_or_else(|| format!("HTTP {status}")),
            },
            wolhub_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
