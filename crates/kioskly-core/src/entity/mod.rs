//! Entity adapters over the shared device snapshot.
//!
//! Each adapter renders one facet of the kiosk as a typed state value and,
//! for controllable variants, forwards commands to the device client.
//! Adapters hold only the shared [`Poller`](crate::Poller) and
//! [`DeviceClient`](kioskly_api::DeviceClient) references -- they cache
//! nothing, and commands never update state optimistically: the next poll
//! (forced after each command) is the source of truth.

pub mod binary_sensor;
pub mod entity_id;
pub mod light;
pub mod media_player;
pub mod sensor;
pub mod switch;

pub use binary_sensor::BinarySensor;
pub use entity_id::EntityId;
pub use light::ScreenLight;
pub use media_player::MediaPlayer;
pub use sensor::Sensor;
pub use switch::ScreensaverSwitch;

use serde::Serialize;

/// Typed state of one entity, read fresh from the snapshot on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EntityState {
    /// No successful poll yet, the last poll failed, or the backing field
    /// is missing from the snapshot.
    Unavailable,
    OnOff(bool),
    Measurement(f64),
    Text(String),
}

impl EntityState {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Shared capability of every adapter variant.
pub trait Entity: Send + Sync {
    fn id(&self) -> &EntityId;

    /// Human-readable name, derived from the device name at setup.
    fn name(&self) -> &str;

    /// Current state, derived purely from the shared snapshot.
    ///
    /// Never panics: with no snapshot or an unhealthy connection this is
    /// [`EntityState::Unavailable`].
    fn state(&self) -> EntityState;

    fn available(&self) -> bool {
        self.state().is_available()
    }
}
