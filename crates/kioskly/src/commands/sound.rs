//! Audio playback command handlers.

use kioskly_core::DeviceConfig;

use crate::cli::{GlobalOpts, SoundArgs, SoundCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    device: DeviceConfig,
    args: SoundArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        SoundCommand::Play { url } => {
            client.play_sound(&url).await?;
            util::confirm(&format!("playing {url}"), global);
        }
        SoundCommand::Stop => {
            client.stop_sound().await?;
            util::confirm("playback stopped", global);
        }
    }
    Ok(())
}
