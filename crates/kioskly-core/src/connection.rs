// ── Connection context ──
//
// One KioskConnection per configured device: it owns the client, the
// poller, and the entity set, and is passed by reference wherever the
// old integration reached into a global registry.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use tokio::task::JoinHandle;
use tracing::info;

use kioskly_api::{DeviceClient, TransportConfig};

use crate::config::DeviceConfig;
use crate::entity::{
    BinarySensor, Entity, EntityId, MediaPlayer, ScreenLight, ScreensaverSwitch, Sensor,
};
use crate::error::CoreError;
use crate::poller::{Poller, poll_task};

/// Device registry metadata, read from the first snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub id: String,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub sw_version: Option<String>,
}

/// Explicit connection context for one kiosk device.
///
/// Built by [`connect`](Self::connect), which fails fast: if the very
/// first poll fails, setup aborts with [`CoreError::NotReady`] and no
/// entities are created. Each connection owns its snapshot, poller, and
/// listener set independently -- there is no cross-device shared state.
pub struct KioskConnection {
    config: DeviceConfig,
    client: Arc<DeviceClient>,
    poller: Arc<Poller>,
    entities: Vec<Arc<dyn Entity>>,
    poll_handle: StdMutex<Option<JoinHandle<()>>>,
}

impl KioskConnection {
    /// Connect to the device: first poll, entity construction, poll task.
    pub async fn connect(config: DeviceConfig) -> Result<Arc<Self>, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = Arc::new(DeviceClient::new(
            &config.host,
            config.port,
            config.password.clone(),
            &transport,
        )?);
        Self::connect_with_client(config, client).await
    }

    /// Like [`connect`](Self::connect) with a pre-built client (tests).
    pub async fn connect_with_client(
        config: DeviceConfig,
        client: Arc<DeviceClient>,
    ) -> Result<Arc<Self>, CoreError> {
        let poller = Poller::new(Arc::clone(&client));

        // Fail-fast first poll: the host's setup-retry machinery handles
        // backoff, not this crate.
        let snapshot = poller.refresh().await.map_err(|e| CoreError::NotReady {
            reason: e.to_string(),
        })?;

        let device_name = snapshot.device_name().unwrap_or(&config.host).to_owned();
        let entities = default_entities(&poller, &client, &device_name);
        info!(
            device = %device_name,
            entities = entities.len(),
            "connected to kiosk"
        );

        let handle = tokio::spawn(poll_task(
            Arc::clone(&poller),
            config.poll_interval,
            poller.cancel_token(),
        ));

        Ok(Arc::new(Self {
            config,
            client,
            poller,
            entities,
            poll_handle: StdMutex::new(Some(handle)),
        }))
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<DeviceClient> {
        &self.client
    }

    pub fn poller(&self) -> &Arc<Poller> {
        &self.poller
    }

    /// All entities owned by this connection.
    pub fn entities(&self) -> &[Arc<dyn Entity>] {
        &self.entities
    }

    /// Look up one of this connection's entities by id.
    pub fn entity(&self, id: &EntityId) -> Option<&Arc<dyn Entity>> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Device registry metadata from the current snapshot.
    pub fn identity(&self) -> Option<DeviceIdentity> {
        let snap = self.poller.snapshot()?;
        Some(DeviceIdentity {
            id: snap.device_id()?.to_owned(),
            name: snap.device_name().unwrap_or(&self.config.host).to_owned(),
            manufacturer: snap.manufacturer().map(str::to_owned),
            model: snap.model().map(str::to_owned),
            sw_version: snap.app_version().map(str::to_owned),
        })
    }

    /// Tear down: cancel the poll task and wait for it to stop. An
    /// in-flight poll completes but its result is discarded.
    pub async fn shutdown(&self) {
        self.poller.shutdown();
        let handle = self
            .poll_handle
            .lock()
            .expect("poll handle lock poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

// Manual impl: the entity list holds trait objects.
impl fmt::Debug for KioskConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KioskConnection")
            .field("host", &self.config.host)
            .field("entities", &self.entities.len())
            .field("healthy", &self.poller.is_healthy())
            .finish_non_exhaustive()
    }
}

/// The default entity set every connection exposes.
fn default_entities(
    poller: &Arc<Poller>,
    client: &Arc<DeviceClient>,
    device_name: &str,
) -> Vec<Arc<dyn Entity>> {
    vec![
        Arc::new(Sensor::new(
            Arc::clone(poller),
            device_name,
            "Battery Level",
            "batteryLevel",
        )),
        Arc::new(Sensor::new(
            Arc::clone(poller),
            device_name,
            "Current Page",
            "currentPage",
        )),
        Arc::new(BinarySensor::new(
            Arc::clone(poller),
            device_name,
            "Plugged In",
            "plugged",
        )),
        Arc::new(BinarySensor::new(
            Arc::clone(poller),
            device_name,
            "Kiosk Mode",
            "kioskMode",
        )),
        Arc::new(ScreensaverSwitch::new(
            Arc::clone(poller),
            Arc::clone(client),
            device_name,
        )),
        Arc::new(ScreenLight::new(
            Arc::clone(poller),
            Arc::clone(client),
            device_name,
        )),
        Arc::new(MediaPlayer::new(
            Arc::clone(poller),
            Arc::clone(client),
            device_name,
        )),
    ]
}
