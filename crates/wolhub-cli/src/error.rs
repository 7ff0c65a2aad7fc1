//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wolhub_config::ConfigError;
use wolhub_core::CoreError;

/// Exit codes for process termination.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to server at {url}")]
    #[diagnostic(
        code(wolhub::connection_failed),
        help(
            "Check that the registry server is running and accessible.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(wolhub::not_found),
        help("Run: wolhub devices list to see registered devices")
    )]
    NotFound { identifier: String },

    #[error("Server rejected the request: {message}")]
    #[diagnostic(code(wolhub::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(wolhub::operation_failed))]
    Operation { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wolhub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No server configured")]
    #[diagnostic(
        code(wolhub::no_server),
        help(
            "Pass --server, set WOLHUB_SERVER, or run: wolhub config init\n\
             Config file: {path}"
        )
    )]
    NoServer { path: String },

    #[error(transparent)]
    #[diagnostic(code(wolhub::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NoServer { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::DeviceNotFound { identifier } => CliError::NotFound { identifier },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::OperationFailed { message } | CoreError::Internal(message) => {
                CliError::Operation { message }
            }

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoServer { path } => CliError::NoServer { path },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
