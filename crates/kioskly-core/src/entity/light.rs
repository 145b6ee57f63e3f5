// Screen-as-light: on/off plus brightness via the device's string setting.

use std::sync::Arc;

use kioskly_api::DeviceClient;

use crate::Poller;
use crate::error::CoreError;

use super::{Entity, EntityId, EntityState};

/// The kiosk screen exposed as a dimmable light.
pub struct ScreenLight {
    id: EntityId,
    name: String,
    poller: Arc<Poller>,
    client: Arc<DeviceClient>,
}

impl ScreenLight {
    pub fn new(poller: Arc<Poller>, client: Arc<DeviceClient>, device_name: &str) -> Self {
        Self {
            id: EntityId::new("light", &format!("{device_name} Screen")),
            name: "Screen".to_owned(),
            poller,
            client,
        }
    }

    /// Screen brightness from the snapshot, device range 0-255.
    pub fn brightness(&self) -> Option<f64> {
        if !self.poller.is_available() {
            return None;
        }
        self.poller.snapshot()?.screen_brightness()
    }

    pub async fn turn_on(&self) -> Result<(), CoreError> {
        self.client.screen_on().await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }

    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.client.screen_off().await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }

    pub async fn set_brightness(&self, level: u8) -> Result<(), CoreError> {
        self.client.set_screen_brightness(level).await?;
        let _ = self.poller.request_refresh().await;
        Ok(())
    }
}

impl Entity for ScreenLight {
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
            .and_then(|snap| snap.screen_on())
            .map_or(EntityState::Unavailable, EntityState::OnOff)
    }
}
