// On/off sensor over one boolean snapshot field.

use std::sync::Arc;

use crate::Poller;

use super::{Entity, EntityId, EntityState};

/// Binary sensor configured with a boolean snapshot field path.
pub struct BinarySensor {
    id: EntityId,
    name: String,
    field: String,
    poller: Arc<Poller>,
}

impl BinarySensor {
    pub fn new(
        poller: Arc<Poller>,
        device_name: &str,
        name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: EntityId::new("binary_sensor", &format!("{device_name} {name}")),
            name,
            field: field.into(),
            poller,
        }
    }
}

impl Entity for BinarySensor {
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
            .and_then(|snap| snap.get_bool(&self.field))
            .map_or(EntityState::Unavailable, EntityState::OnOff)
    }
}
