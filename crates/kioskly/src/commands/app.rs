//! Application-level command handlers.

use kioskly_core::DeviceConfig;

use crate::cli::{AppArgs, AppCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    device: DeviceConfig,
    args: AppArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        AppCommand::Restart => {
            client.restart_app().await?;
            util::confirm("app restarting", global);
        }
        AppCommand::Foreground => {
            client.to_foreground().await?;
            util::confirm("app brought to foreground", global);
        }
    }
    Ok(())
}
