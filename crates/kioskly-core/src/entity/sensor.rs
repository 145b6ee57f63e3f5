// Generic read-only sensor over one snapshot field.

use std::sync::Arc;

use serde_json::Value;

use crate::Poller;

use super::{Entity, EntityId, EntityState};

/// Sensor configured with a snapshot field path.
///
/// Renders numbers as measurements and strings as text; anything else
/// (or a missing field) is unavailable.
pub struct Sensor {
    id: EntityId,
    name: String,
    field: String,
    poller: Arc<Poller>,
}

impl Sensor {
    pub fn new(
        poller: Arc<Poller>,
        device_name: &str,
        name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: EntityId::new("sensor", &format!("{device_name} {name}")),
            name,
            field: field.into(),
            poller,
        }
    }
}

impl Entity for Sensor {
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
        let Some(snapshot) = self.poller.snapshot() else {
            return EntityState::Unavailable;
        };
        match snapshot.get(&self.field) {
            Some(Value::Number(n)) => n
                .as_f64()
                .map_or(EntityState::Unavailable, EntityState::Measurement),
            Some(Value::String(s)) => EntityState::Text(s.clone()),
            Some(Value::Bool(b)) => EntityState::OnOff(*b),
            _ => EntityState::Unavailable,
        }
    }
}
