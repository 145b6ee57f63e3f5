// ── set_configuration_string service ──
//
// Resolves entity ids to their owning connection and pushes one string
// setting per entity. Failures are per-entity: one bad id or one dead
// device never aborts the rest of the batch, and nothing is retried.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::connection::KioskConnection;
use crate::entity::EntityId;
use crate::error::CoreError;

/// A request to set one configuration key/value pair on the devices
/// owning the referenced entities. `value` is required.
#[derive(Debug, Clone)]
pub struct SetConfigurationString {
    pub entity_ids: Vec<EntityId>,
    pub setting: String,
    pub value: String,
}

/// Per-entity outcome of a service call.
#[derive(Debug, Default)]
pub struct ServiceReport {
    pub succeeded: Vec<EntityId>,
    pub failed: Vec<(EntityId, CoreError)>,
}

impl ServiceReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Maps entity ids to their owning connection and dispatches service
/// calls. One registry serves all configured devices.
#[derive(Default)]
pub struct ServiceRegistry {
    by_entity: DashMap<EntityId, Arc<KioskConnection>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every entity of a connection.
    pub fn register(&self, connection: &Arc<KioskConnection>) {
        for entity in connection.entities() {
            self.by_entity
                .insert(entity.id().clone(), Arc::clone(connection));
        }
    }

    /// Remove a connection's entities (teardown path).
    pub fn deregister(&self, connection: &Arc<KioskConnection>) {
        for entity in connection.entities() {
            self.by_entity.remove(entity.id());
        }
    }

    /// Resolve an entity id to its owning connection.
    pub fn resolve(&self, id: &EntityId) -> Option<Arc<KioskConnection>> {
        self.by_entity.get(id).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Handle a `set_configuration_string` call.
    ///
    /// Unresolvable ids fail with [`CoreError::UnknownEntity`] without any
    /// device call; transport failures are reported per entity.
    pub async fn set_configuration_string(
        &self,
        request: SetConfigurationString,
    ) -> ServiceReport {
        let mut report = ServiceReport::default();

        for entity_id in request.entity_ids {
            let Some(connection) = self.resolve(&entity_id) else {
                warn!(entity = %entity_id, "service call references unknown entity");
                report.failed.push((
                    entity_id.clone(),
                    CoreError::UnknownEntity {
                        entity_id: entity_id.to_string(),
                    },
                ));
                continue;
            };

            match connection
                .client()
                .set_string_setting(&request.setting, &request.value)
                .await
            {
                Ok(()) => {
                    debug!(entity = %entity_id, setting = %request.setting, "setting pushed");
                    report.succeeded.push(entity_id);
                }
                Err(e) => {
                    warn!(entity = %entity_id, error = %e, "setting push failed");
                    report.failed.push((entity_id, e.into()));
                }
            }
        }

        report
    }
}
