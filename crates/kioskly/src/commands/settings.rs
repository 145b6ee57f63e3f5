//! Device settings command handlers.

use tabled::Tabled;

use kioskly_core::DeviceConfig;

use crate::cli::{GlobalOpts, OutputFormat, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    device: DeviceConfig,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        SettingsCommand::List => {
            let settings = client.list_settings().await?;

            let out = match global.output {
                OutputFormat::Json => output::render_json_pretty(&settings),
                OutputFormat::JsonCompact => output::render_json_compact(&settings),
                OutputFormat::Table | OutputFormat::Plain => {
                    let pairs: Vec<(String, String)> = settings
                        .as_object()
                        .map(|map| {
                            map.iter()
                                .map(|(k, v)| (k.clone(), compact_value(v)))
                                .collect()
                        })
                        .unwrap_or_default();
                    output::render_list(
                        &global.output,
                        &pairs,
                        |(key, value)| SettingRow {
                            key: key.clone(),
                            value: value.clone(),
                        },
                        |(key, value)| format!("{key}={value}"),
                    )
                }
            };
            output::print_output(&out, global.quiet);
        }

        SettingsCommand::Set { key, value } => {
            client.set_string_setting(&key, &value).await?;
            util::confirm(&format!("{key} = {value}"), global);
        }

        SettingsCommand::SetBool { key, value } => {
            client.set_boolean_setting(&key, value).await?;
            util::confirm(&format!("{key} = {value}"), global);
        }
    }
    Ok(())
}

/// Single-line rendering of a settings value for table output.
fn compact_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
