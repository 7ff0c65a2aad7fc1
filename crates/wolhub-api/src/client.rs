// Hand-crafted async HTTP client for the wolhub registry API.
//
// Endpoints (all JSON, no auth):
//   GET    api/devices
//   POST   api/devices
//   POST   api/wake/{identifier}
//   DELETE api/devices/{identifier}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Wire types ───────────────────────────────────────────────────────

/// A registered device, exactly as the server stores it.
///
/// The client holds a read-only snapshot; the server is the sole
/// source of truth for the device set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub mac_address: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub broadcast_ip: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Success body of a wake request: `{message}` from the server,
/// surfaced to the user verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct WakeReceipt {
    pub message: String,
}

// ── Error response shape ─────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the wolhub registry API.
///
/// One request/response cycle per call; no retries. Transport-level
/// and application-level failures both surface as [`Error`],
/// distinguished only by whether a `detail` could be extracted.
pub struct WolClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WolClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments onto the base URL. Each segment is pushed
    /// individually so identifiers get percent-escaped.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .expect("base URL should be hierarchical");
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        url
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch the full device set. A non-array payload is a failure.
    pub async fn list(&self) -> Result<Vec<Device>, Error> {
        let url = self.url(&["api", "devices"]);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// Register a new device.
    pub async fn create(&self, device: &Device) -> Result<(), Error> {
        let url = self.url(&["api", "devices"]);
        debug!("POST {url}");

        let resp = self.http.post(url).json(device).send().await?;
        handle_empty(resp).await
    }

    /// Ask the server to send a wake packet to `identifier`.
    ///
    /// Whether the identifier is a name or a MAC address is a
    /// deployment-time contract with the server; the client treats it
    /// as opaque.
    pub async fn wake(&self, identifier: &str) -> Result<WakeReceipt, Error> {
        let url = self.url(&["api", "wake", identifier]);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        handle_response(resp).await
    }

    /// Delete the device keyed by `identifier`.
    pub async fn remove(&self, identifier: &str) -> Result<(), Error> {
        let url = self.url(&["api", "devices", identifier]);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

/// Normalize the base URL to end in `/` so segment pushes compose.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

/// Map a non-2xx response to [`Error::Api`], extracting `{detail}`
/// from the body when present.
async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|e| e.detail);

    Error::Api {
        status: status.as_u16(),
        detail,
    }
}
