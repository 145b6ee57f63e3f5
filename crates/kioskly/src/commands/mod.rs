//! Command handlers, one module per command group.

pub mod app;
pub mod config_cmd;
pub mod screen;
pub mod screensaver;
pub mod settings;
pub mod sound;
pub mod status;
pub mod url;
pub mod util;

use kioskly_core::DeviceConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    device: DeviceConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Status => status::status(device, global).await,
        Command::Entities => status::entities(device, global).await,
        Command::Watch(args) => status::watch(device, args, global).await,
        Command::Screen(args) => screen::handle(device, args, global).await,
        Command::Screensaver(args) => screensaver::handle(device, args, global).await,
        Command::Sound(args) => sound::handle(device, args, global).await,
        Command::Url(args) => url::handle(device, args, global).await,
        Command::App(args) => app::handle(device, args, global).await,
        Command::Settings(args) => settings::handle(device, args, global).await,

        // Handled in main before a device config is resolved.
        Command::Config(_) | Command::Completions(_) => unreachable!("handled in main"),
    }
}
