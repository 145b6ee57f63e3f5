//! Screensaver command handlers.

use kioskly_core::DeviceConfig;

use crate::cli::{GlobalOpts, ScreensaverArgs, ScreensaverCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    device: DeviceConfig,
    args: ScreensaverArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        ScreensaverCommand::Start => {
            client.start_screensaver().await?;
            util::confirm("screensaver started", global);
        }
        ScreensaverCommand::Stop => {
            client.stop_screensaver().await?;
            util::confirm("screensaver stopped", global);
        }
    }
    Ok(())
}
