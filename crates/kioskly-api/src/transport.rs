// Shared transport configuration for building reqwest::Client instances.
//
// Fully Kiosk devices serve plain HTTP on the local network, so there is
// no TLS knob here -- only timeout and client construction, kept in one
// place so the library and tests build identical clients.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. The device treats a slow network and a dead
    /// network the same way, so this is the only deadline in the system.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("kioskly/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::error::Error::Api {
                status: 0,
                message: format!("failed to build HTTP client: {e}"),
            })
    }
}
