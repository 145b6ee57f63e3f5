//! Shared helpers for command handlers.

use owo_colors::OwoColorize;

use kioskly_api::{DeviceClient, TransportConfig};
use kioskly_core::{DeviceConfig, EntityState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Build a one-shot device client from resolved config.
pub fn build_client(device: &DeviceConfig) -> Result<DeviceClient, CliError> {
    let transport = TransportConfig {
        timeout: device.timeout,
    };
    Ok(DeviceClient::new(
        &device.host,
        device.port,
        device.password.clone(),
        &transport,
    )?)
}

/// Print a success confirmation line, respecting quiet and color modes.
pub fn confirm(message: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if output::should_color(&global.color) {
        println!("{} {message}", "✓".green());
    } else {
        println!("✓ {message}");
    }
}

/// Human-readable form of an entity state.
pub fn format_state(state: &EntityState) -> String {
    match state {
        EntityState::Unavailable => "unavailable".to_owned(),
        EntityState::OnOff(true) => "on".to_owned(),
        EntityState::OnOff(false) => "off".to_owned(),
        EntityState::Measurement(value) => value.to_string(),
        EntityState::Text(text) => text.clone(),
    }
}
