//! CLI configuration command handlers (no device connection needed).

use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Default")]
    default: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Profiles => profiles(global),
        ConfigCommand::Use { name } => use_profile(&name, global),
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();
    if path.exists() {
        return Err(CliError::Validation {
            field: "config".into(),
            reason: format!("config file already exists at {}", path.display()),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, config::STARTER_CONFIG)?;
    util::confirm(&format!("wrote {}", path.display()), global);
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = config::load_config()?;

    // Never echo stored passwords.
    for profile in config.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }

    let rendered = toml::to_string_pretty(&config)?;
    output::print_output(rendered.trim_end(), global.quiet);
    Ok(())
}

fn profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let config = config::load_config_or_default();
    let default = config.default_profile.clone().unwrap_or_default();

    // Passwords never leave the file, in any output format.
    let rows: Vec<(String, config::Profile)> = config
        .profiles
        .iter()
        .map(|(name, profile)| {
            let mut profile = profile.clone();
            profile.password = None;
            (name.clone(), profile)
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &rows,
        |(name, profile)| ProfileRow {
            name: name.clone(),
            host: profile.host.clone(),
            port: profile.port.map(|p| p.to_string()).unwrap_or_default(),
            default: if *name == default { "*".into() } else { String::new() },
        },
        |(name, _)| name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn use_profile(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = config::load_config_or_default();
    if !config.profiles.contains_key(name) {
        return Err(CliError::ProfileNotFound {
            name: name.to_owned(),
            available: config
                .profiles
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        });
    }
    config.default_profile = Some(name.to_owned());
    config::save_config(&config)?;
    util::confirm(&format!("default profile set to '{name}'"), global);
    Ok(())
}
