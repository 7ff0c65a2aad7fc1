// wolhub-api: Async Rust client for the wolhub Wake-on-LAN registry API

pub mod client;
pub mod error;
pub mod transport;

pub use client::{Device, WakeReceipt, WolClient};
pub use error::Error;
pub use transport::TransportConfig;
