//! CLI configuration: TOML profiles with environment overrides.
//!
//! The config file holds named device profiles; `GlobalOpts` flags and
//! `KIOSKLY_*` environment variables override profile values. Resolution
//! order is flag > env > profile > default.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use kioskly_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── File format ─────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Device host or IP.
    pub host: String,

    /// Remote admin port (default 2323).
    pub port: Option<u16>,

    /// Remote admin password. Prefer KIOSKLY_PASSWORD over storing it here.
    pub password: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Poll interval in seconds for `watch`.
    pub poll_interval_secs: Option<u64>,
}

// ── Loading & saving ────────────────────────────────────────────────

/// Path of the config file (`~/.config/kioskly/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "kioskly") {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("kioskly.toml")
    }
}

/// Load the config file, merged with `KIOSKLY_CONFIG_*` env overrides.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("KIOSKLY_CONFIG_").split("__"));
    Ok(figment.extract()?)
}

/// Load the config file, falling back to an empty config when absent or
/// unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write the config back to disk, creating parent directories as needed.
pub fn save_config(config: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(config)?;
    std::fs::write(path, rendered)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DeviceConfig` from the config file, profile, and CLI overrides.
pub fn resolve_device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let config = load_config_or_default();
    let profile_name = active_profile_name(global, &config);
    let profile = config.profiles.get(&profile_name);

    // An explicitly requested profile must exist.
    if global.profile.is_some() && profile.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: config
                .profiles
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    // 1. Host (flag > env > profile)
    let host = global
        .host
        .clone()
        .or_else(|| profile.map(|p| p.host.clone()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;

    // 2. Password (flag > env > profile)
    let password = global
        .password
        .clone()
        .or_else(|| profile.and_then(|p| p.password.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut device = DeviceConfig::new(host, SecretString::from(password));

    // 3. Port, timeout, poll interval
    if let Some(port) = global.port.or_else(|| profile.and_then(|p| p.port)) {
        device.port = port;
    }
    device.timeout = Duration::from_secs(global.timeout);
    if let Some(secs) = profile.and_then(|p| p.poll_interval_secs) {
        device.poll_interval = Duration::from_secs(secs);
    }

    Ok(device)
}

// ── Starter config ──────────────────────────────────────────────────

/// Template written by `kioskly config init`.
pub const STARTER_CONFIG: &str = r#"# kioskly configuration
#
# Each profile names one Fully Kiosk device. Select with --profile or
# KIOSKLY_PROFILE; the password can also come from KIOSKLY_PASSWORD.

default_profile = "lobby"

[profiles.lobby]
host = "192.168.1.50"
port = 2323
# password = "your-remote-admin-password"
# timeout_secs = 10
# poll_interval_secs = 30
"#;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starter_config_parses() {
        let config: Config = toml::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("lobby"));
        let lobby = config.profiles.get("lobby").unwrap();
        assert_eq!(lobby.host, "192.168.1.50");
        assert_eq!(lobby.port, Some(2323));
        assert!(lobby.password.is_none());
    }
}
