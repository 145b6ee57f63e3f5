//! Device status, entity listing, and periodic watch.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tabled::Tabled;

use kioskly_api::DeviceInfo;
use kioskly_core::{DeviceConfig, KioskConnection};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

// ── status ──────────────────────────────────────────────────────────

/// One deviceInfo fetch, rendered in the chosen format.
pub async fn status(device: DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let client = util::build_client(&device)?;
    let info = client.device_info().await?;

    let out = output::render_single(&global.output, &info, status_detail, |info| {
        info.device_name().unwrap_or(&device.host).to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Key/value detail view for `--output table`.
fn status_detail(info: &DeviceInfo) -> String {
    let mut out = String::new();
    let mut field = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = writeln!(out, "{label:<14} {value}");
        }
    };

    field("Name", info.device_name().map(str::to_owned));
    field("Device ID", info.device_id().map(str::to_owned));
    field("Manufacturer", info.manufacturer().map(str::to_owned));
    field("Model", info.model().map(str::to_owned));
    field("App version", info.app_version().map(str::to_owned));
    field("Android", info.android_version().map(str::to_owned));
    field("Battery", info.battery_level().map(|v| format!("{v}%")));
    field("Plugged in", info.plugged().map(|v| v.to_string()));
    field("Screen on", info.screen_on().map(|v| v.to_string()));
    field("Screensaver", info.in_screensaver().map(|v| v.to_string()));
    field("Kiosk mode", info.kiosk_mode().map(|v| v.to_string()));
    field("Current page", info.current_page().map(str::to_owned));
    field("Start URL", info.start_url().map(str::to_owned));
    field("IP address", info.ip4().map(str::to_owned));
    field("WiFi SSID", info.ssid().map(str::to_owned));

    out.trim_end().to_owned()
}

// ── entities ────────────────────────────────────────────────────────

/// Connect, list every entity with its current state, disconnect.
pub async fn entities(device: DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let connection = KioskConnection::connect(device).await?;

    let states: Vec<(String, String, String)> = connection
        .entities()
        .iter()
        .map(|e| {
            (
                e.id().to_string(),
                e.name().to_owned(),
                util::format_state(&e.state()),
            )
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &states,
        |(id, name, state)| EntityRow {
            id: id.clone(),
            name: name.clone(),
            state: state.clone(),
        },
        |(id, _, state)| format!("{id} {state}"),
    );
    output::print_output(&out, global.quiet);

    connection.shutdown().await;
    Ok(())
}

// ── watch ───────────────────────────────────────────────────────────

/// Poll the device on an interval and print entity states after every
/// cycle, including failed ones. Runs until Ctrl-C or `--count` polls.
pub async fn watch(
    mut device: DeviceConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    device.poll_interval = args.interval;
    let connection = KioskConnection::connect(device).await?;

    // Bridge the synchronous listener callback into the async loop.
    let cycle = Arc::new(tokio::sync::Notify::new());
    let notifier = Arc::clone(&cycle);
    let _listener = connection.poller().add_listener(move || {
        notifier.notify_one();
    });

    print_cycle(&connection, global);
    let mut polled: u64 = 1;

    while args.count.is_none_or(|n| polled < n) {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            () = cycle.notified() => {
                print_cycle(&connection, global);
                polled += 1;
            }
        }
    }

    connection.shutdown().await;
    Ok(())
}

/// Print one line per entity, prefixed with the cycle timestamp.
fn print_cycle(connection: &Arc<KioskConnection>, global: &GlobalOpts) {
    let now = Utc::now().format("%H:%M:%S");

    let out = match global.output {
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let states: serde_json::Map<String, serde_json::Value> = connection
                .entities()
                .iter()
                .map(|e| (e.id().to_string(), json!(e.state())))
                .collect();
            let record = json!({
                "time": now.to_string(),
                "healthy": connection.poller().is_healthy(),
                "states": states,
            });
            match global.output {
                OutputFormat::JsonCompact => output::render_json_compact(&record),
                _ => output::render_json_pretty(&record),
            }
        }
        _ => connection
            .entities()
            .iter()
            .map(|e| format!("{now}  {:<40} {}", e.id().to_string(), util::format_state(&e.state())))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    output::print_output(&out, global.quiet);
}
