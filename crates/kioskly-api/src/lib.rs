//! Async client for the Fully Kiosk Browser remote admin REST API.
//!
//! Fully Kiosk exposes a single-endpoint HTTP API: every operation is a
//! `GET /?cmd=<command>&type=json&password=<pw>` request against the device,
//! with command-specific query parameters. Status queries return a flat JSON
//! object ([`DeviceInfo`]); mutating commands return a
//! `{"status": "OK"|"Error", "statustext": "..."}` envelope which this crate
//! unwraps into typed results.
//!
//! - **[`DeviceClient`]** — the HTTP client. One instance per device.
//! - **[`DeviceInfo`]** — last-known device status payload with typed
//!   accessors over the raw key/value map.
//! - **[`TransportConfig`]** — shared timeout/client construction.
//! - **[`Error`]** — every failure mode of the wire layer; `kioskly-core`
//!   maps these into user-facing diagnostics.

pub mod client;
pub mod error;
pub mod info;
pub mod transport;

pub use client::DeviceClient;
pub use error::Error;
pub use info::DeviceInfo;
pub use transport::TransportConfig;
