//! Shared configuration for the wolhub CLI and TUI.
//!
//! A single TOML file layered with `WOLHUB_`-prefixed environment
//! variables, plus translation to `wolhub_core::ConsoleConfig`. Both
//! binaries depend on this crate; CLI flags override on top.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wolhub_core::{ConsoleConfig, FeedbackChannel, IdentityKey};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no server configured; set `server` in {path} or WOLHUB_SERVER")]
    NoServer { path: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Registry server base URL (e.g., "http://192.168.1.10:8000").
    pub server: Option<String>,

    /// Which device field identifies wake/delete targets.
    #[serde(default)]
    pub identity_key: IdentityKey,

    /// Toast-style or blocking-dialog feedback.
    #[serde(default)]
    pub feedback: FeedbackChannel,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: None,
            identity_key: IdentityKey::default(),
            feedback: FeedbackChannel::default(),
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wolhub", "wolhub").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wolhub");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Load from an explicit file path layered with `WOLHUB_*` env vars.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WOLHUB_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `ConsoleConfig` from the loaded file, with an optional
/// server override (CLI flag or env already merged in).
pub fn to_console_config(
    cfg: &Config,
    server_override: Option<&str>,
) -> Result<ConsoleConfig, ConfigError> {
    let raw = server_override
        .map(str::to_owned)
        .or_else(|| cfg.server.clone())
        .ok_or_else(|| ConfigError::NoServer {
            path: config_path().display().to_string(),
        })?;

    let server: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    Ok(ConsoleConfig {
        server,
        identity: cfg.identity_key,
        feedback: cfg.feedback,
        timeout: Duration::from_secs(cfg.timeout),
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("missing.toml")).unwrap();

        assert_eq!(cfg.server, None);
        assert_eq!(cfg.identity_key, IdentityKey::MacAddress);
        assert_eq!(cfg.feedback, FeedbackChannel::Toast);
        assert_eq!(cfg.timeout, 30);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server = \"http://wol.local:8000\"\nidentity_key = \"name\"\nfeedback = \"dialog\"\ntimeout = 5\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("http://wol.local:8000"));
        assert_eq!(cfg.identity_key, IdentityKey::Name);
        assert_eq!(cfg.feedback, FeedbackChannel::Dialog);
        assert_eq!(cfg.timeout, 5);
    }

    #[test]
    fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            server: Some("http://192.168.1.10:8000".into()),
            identity_key: IdentityKey::Name,
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.server, cfg.server);
        assert_eq!(reloaded.identity_key, IdentityKey::Name);
    }

    #[test]
    fn console_config_requires_a_server() {
        let cfg = Config::default();
        assert!(matches!(
            to_console_config(&cfg, None),
            Err(ConfigError::NoServer { .. })
        ));

        let console = to_console_config(&cfg, Some("http://wol.local:8000")).unwrap();
        assert_eq!(console.server.as_str(), "http://wol.local:8000/");
        assert_eq!(console.timeout, Duration::from_secs(30));
    }

    #[test]
    fn console_config_rejects_a_malformed_server() {
        let cfg = Config::default();
        assert!(matches!(
            to_console_config(&cfg, Some("not a url")),
            Err(ConfigError::Validation { .. })
        ));
    }
}
