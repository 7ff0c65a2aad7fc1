// ── Device model ──
//
// The wire-level `Device` lives in wolhub-api; this module adds the
// client-side pieces: form assembly with the field defaulting rules,
// and the configurable identifying field.

use serde::{Deserialize, Serialize};

pub use wolhub_api::Device;

/// Conventional Wake-on-LAN port, applied when the form field is
/// blank or not a number.
pub const DEFAULT_WAKE_PORT: u16 = 9;

/// Limited broadcast address, applied when the form field is blank.
pub const LIMITED_BROADCAST: &str = "255.255.255.255";

// ── Form assembly ────────────────────────────────────────────────────

/// Raw string fields as captured from an input form.
///
/// `name` and `mac_address` are required and checked at the source
/// (the front end refuses to dispatch an incomplete form); the
/// remaining fields apply defaults during [`assemble`](Self::assemble).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceForm {
    pub name: String,
    pub mac_address: String,
    pub ip_address: String,
    pub broadcast_ip: String,
    pub port: String,
}

impl DeviceForm {
    /// Whether the required fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.mac_address.trim().is_empty()
    }

    /// Build the create payload, applying the field defaulting rules:
    /// empty `ip_address` becomes `null`, empty `broadcast_ip` becomes
    /// the limited broadcast address, and `port` falls back to 9 on
    /// absence or parse failure. MAC format is the server's concern.
    pub fn assemble(&self) -> Device {
        Device {
            name: self.name.trim().to_owned(),
            mac_address: self.mac_address.trim().to_owned(),
            ip_address: non_blank(&self.ip_address),
            broadcast_ip: non_blank(&self.broadcast_ip)
                .or_else(|| Some(LIMITED_BROADCAST.to_owned())),
            port: Some(self.port.trim().parse().unwrap_or(DEFAULT_WAKE_PORT)),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

// ── Identifying field ────────────────────────────────────────────────

/// Which device attribute keys wake/delete requests.
///
/// A deployment-time contract with the server, never negotiated at
/// runtime; the orchestrator treats the chosen field as an opaque
/// identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKey {
    Name,
    #[default]
    MacAddress,
}

impl IdentityKey {
    /// The identifying field of `device` under this key choice.
    pub fn of<'a>(self, device: &'a Device) -> &'a str {
        match self {
            Self::Name => &device.name,
            Self::MacAddress => &device.mac_address,
        }
    }

    /// Human-readable label for prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::MacAddress => "MAC address",
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
