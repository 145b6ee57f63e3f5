// ── Runtime connection configuration ──
//
// These types describe *how* to reach one Fully Kiosk device. They carry
// credential data and polling tuning, but never touch disk -- the CLI
// constructs a `DeviceConfig` from its own config layer and hands it in.

use std::time::Duration;

use secrecy::SecretString;

/// Configuration for connecting to a single kiosk device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device hostname or IP address.
    pub host: String,
    /// Remote admin port (Fully Kiosk default is 2323).
    pub port: u16,
    /// Remote admin password.
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How often to poll device status.
    pub poll_interval: Duration,
}

impl DeviceConfig {
    /// Config with default port, timeout, and 30s poll interval.
    pub fn new(host: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            port: 2323,
            password,
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(30),
        }
    }
}
