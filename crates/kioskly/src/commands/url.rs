//! Browser navigation command handlers.

use kioskly_core::DeviceConfig;

use crate::cli::{GlobalOpts, UrlArgs, UrlCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    device: DeviceConfig,
    args: UrlArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = util::build_client(&device)?;

    match args.command {
        UrlCommand::Load { url } => {
            client.load_url(&url).await?;
            util::confirm(&format!("loading {url}"), global);
        }
        UrlCommand::Home => {
            client.load_start_url().await?;
            util::confirm("loading start URL", global);
        }
    }
    Ok(())
}
