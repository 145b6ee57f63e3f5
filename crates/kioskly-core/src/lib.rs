//! Polling and entity layer between `kioskly-api` and consumers (CLI,
//! automation hosts).
//!
//! This crate owns the business logic for one or more Fully Kiosk device
//! connections:
//!
//! - **[`KioskConnection`]** — Explicit connection context:
//!   [`connect()`](KioskConnection::connect) performs a fail-fast first
//!   poll, builds the entity set, and spawns the periodic poll task.
//!
//! - **[`Poller`]** — Periodic device-status refresh with an atomically
//!   swapped immutable snapshot, a health flag, synchronous listener
//!   fan-out after every cycle, and single-flight coalescing of
//!   [`request_refresh()`](Poller::request_refresh) calls.
//!
//! - **[`ListenerRegistry`]** — Plain observer list; handles deregister
//!   idempotently and on drop.
//!
//! - **Entity adapters** ([`entity`]) — Typed read views over the shared
//!   snapshot (sensor, binary sensor, switch, light, media player) with
//!   commands forwarded straight to the device client.
//!
//! - **[`ServiceRegistry`]** — Entity-to-connection resolution and the
//!   `set_configuration_string` batch service with per-entity failure
//!   reporting.

pub mod config;
pub mod connection;
pub mod entity;
pub mod error;
pub mod listeners;
pub mod poller;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DeviceConfig;
pub use connection::{DeviceIdentity, KioskConnection};
pub use entity::{Entity, EntityId, EntityState};
pub use error::CoreError;
pub use listeners::{ListenerHandle, ListenerRegistry};
pub use poller::Poller;
pub use service::{ServiceRegistry, ServiceReport, SetConfigurationString};
