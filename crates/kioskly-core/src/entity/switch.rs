// Screensaver switch: start/stop the device screensaver.

use std::sync::Arc;

use kioskly_api::DeviceClient;

use crate::Poller;
use crate::error::CoreError;

use super::{Entity, EntityId, EntityState};

/// Switch controlling the device screensaver.
///
/// State comes from the snapshot's screensaver flag; commands go straight
/// to the device and the next (forced) poll reports the new truth.
pub struct ScreensaverSwitch {
    id: EntityId,
    name: String,
    poller: Arc<Poller>,
    client: Arc<DeviceClient>,
}

impl ScreensaverSwitch {
    pub fn new(poller: Arc<Poller>, client: Arc<DeviceClient>, device_name: &str) -> Self {
        Self {
            id: EntityId::new("switch", &format!("{device_name} Screensaver")),
            name: "Screensaver".to_owned(),
            poller,
            client,
        }
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.client.start_screensaver().await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.client.stop_screensaver().await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }
}

impl Entity for ScreensaverSwitch {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> EntityState {
        if !self.poller.is_available() {
            return EntityState::Unavailable;
        }
        self.poller
            .snapshot()
            .and_then(|snap| snap.in_screensaver())
            .map_or(EntityState::Unavailable, EntityState::OnOff)
    }
}
