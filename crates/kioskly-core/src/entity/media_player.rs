// Media player: play audio URLs through the kiosk's speaker.

use std::sync::Arc;

use kioskly_api::DeviceClient;

use crate::Poller;
use crate::error::CoreError;

use super::{Entity, EntityId, EntityState};

/// The kiosk's audio playback surface.
///
/// The device does not report playback position or track state, so this
/// adapter is command-oriented: `state()` only distinguishes available
/// from unavailable.
pub struct MediaPlayer {
    id: EntityId,
    name: String,
    poller: Arc<Poller>,
    client: Arc<DeviceClient>,
}

impl MediaPlayer {
    pub fn new(poller: Arc<Poller>, client: Arc<DeviceClient>, device_name: &str) -> Self {
        Self {
            id: EntityId::new("media_player", device_name),
            name: "Media Player".to_owned(),
            poller,
            client,
        }
    }

    /// Play an audio file by URL on the device.
    pub async fn play_media(&self, media_url: &str) -> Result<(), CoreError> {
        self.client.play_sound(media_url).await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }

    pub async fn stop_media(&self) -> Result<(), CoreError> {
        self.client.stop_sound().await?;
        Ok(())
    }
}

impl Entity for MediaPlayer {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> EntityState {
        if self.poller.is_available() {
            EntityState::Text("idle".to_owned())
        } else {
            EntityState::Unavailable
        }
    }
}
