// Transport configuration for building the reqwest::Client.
//
// The registry API is plain HTTP with no auth, so the only knobs are
// the request timeout and the user agent.

use std::time::Duration;

/// Transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("wolhub/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}
