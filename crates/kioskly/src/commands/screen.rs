//! Screen command handlers.

use kioskly_core::DeviceConfig;

use crate::cli::{GlobalOpts, ScreenArgs, ScreenCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    device: DeviceConfig,
    args: ScreenArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        ScreenCommand::On => {
            client.screen_on().await?;
            util::confirm("screen on", global);
        }
        ScreenCommand::Off => {
            client.screen_off().await?;
            util::confirm("screen off", global);
        }
        ScreenCommand::Brightness { level } => {
            client.set_screen_brightness(level).await?;
            util::confirm(&format!("brightness set to {level}"), global);
        }
    }
    Ok(())
}
