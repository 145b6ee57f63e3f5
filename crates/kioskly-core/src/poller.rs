// ── Device status poller ──
//
// Owns the snapshot for one device connection. A poll cycle calls the
// device, publishes (or withholds) the snapshot, flips the health flag,
// and notifies listeners -- in that order, on success and failure alike.
// Concurrent refresh requests coalesce onto the in-flight poll.

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use kioskly_api::{DeviceClient, DeviceInfo};

use crate::error::CoreError;
use crate::listeners::{ListenerHandle, ListenerRegistry};

/// Periodic status poller for one kiosk device.
///
/// The snapshot is replaced wholesale on every successful poll (single
/// atomic pointer swap) and left untouched on failure, so readers always
/// see the last *successful* payload. The health flag tells consumers
/// whether that payload is current.
pub struct Poller {
    client: Arc<DeviceClient>,
    snapshot: ArcSwapOption<DeviceInfo>,
    healthy: watch::Sender<bool>,
    last_updated: watch::Sender<Option<DateTime<Utc>>>,
    /// Human-readable reason for the last failed poll.
    last_error: StdMutex<Option<String>>,
    /// Bumped once per completed poll cycle; coalesced waiters watch this.
    cycle: watch::Sender<u64>,
    /// Held for the duration of one device call. `try_lock` failure means
    /// a poll is in flight and the caller should wait for it instead.
    refresh_lock: Mutex<()>,
    listeners: ListenerRegistry,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(client: Arc<DeviceClient>) -> Arc<Self> {
        let (healthy, _) = watch::channel(false);
        let (last_updated, _) = watch::channel(None);
        let (cycle, _) = watch::channel(0u64);

        Arc::new(Self {
            client,
            snapshot: ArcSwapOption::empty(),
            healthy,
            last_updated,
            last_error: StdMutex::new(None),
            cycle,
            refresh_lock: Mutex::new(()),
            listeners: ListenerRegistry::new(),
            cancel: CancellationToken::new(),
        })
    }

    // ── Read side ────────────────────────────────────────────────────

    /// The last successfully fetched snapshot, if any poll has succeeded.
    pub fn snapshot(&self) -> Option<Arc<DeviceInfo>> {
        self.snapshot.load_full()
    }

    /// `true` once a poll has succeeded and no later poll has failed.
    pub fn is_healthy(&self) -> bool {
        *self.healthy.borrow()
    }

    /// A snapshot exists and the last poll succeeded.
    pub fn is_available(&self) -> bool {
        self.is_healthy() && self.snapshot.load().is_some()
    }

    /// Subscribe to health transitions.
    pub fn health(&self) -> watch::Receiver<bool> {
        self.healthy.subscribe()
    }

    /// Subscribe to the timestamp of the last successful poll.
    pub fn last_updated(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_updated.subscribe()
    }

    /// Register a listener invoked after every poll cycle.
    pub fn add_listener(&self, callback: impl Fn() + Send + Sync + 'static) -> ListenerHandle {
        self.listeners.add(callback)
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Poll the device now, waiting behind any in-flight poll.
    ///
    /// Used by the setup path (fail-fast first poll) and the interval
    /// task. Listeners are notified before this returns.
    pub async fn refresh(&self) -> Result<Arc<DeviceInfo>, CoreError> {
        let _guard = self.refresh_lock.lock().await;
        self.poll_device().await
    }

    /// Request an out-of-band refresh, coalescing with any in-flight poll.
    ///
    /// If a poll is already running, this waits for that poll's completion
    /// instead of issuing a second device call.
    pub async fn request_refresh(&self) -> Result<Arc<DeviceInfo>, CoreError> {
        let mut cycle_rx = self.cycle.subscribe();
        cycle_rx.borrow_and_update();

        match self.refresh_lock.try_lock() {
            Ok(_guard) => self.poll_device().await,
            Err(_) => {
                // Attach to the in-flight poll. A cancelled poll completes
                // without bumping the cycle, so teardown must release
                // waiters directly.
                tokio::select! {
                    () = self.cancel.cancelled() => Err(CoreError::ShuttingDown),
                    changed = cycle_rx.changed() => {
                        changed.map_err(|_| CoreError::ShuttingDown)?;
                        self.current_outcome()
                    }
                }
            }
        }
    }

    /// Stop publishing: cancels the interval task and makes any in-flight
    /// poll discard its result.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// One poll cycle. Caller must hold `refresh_lock`.
    async fn poll_device(&self) -> Result<Arc<DeviceInfo>, CoreError> {
        let result = self.client.device_info().await;

        // Nothing is published after teardown begins.
        if self.cancel.is_cancelled() {
            return Err(CoreError::ShuttingDown);
        }

        let outcome = match result {
            Ok(info) => {
                let info = Arc::new(info);
                self.snapshot.store(Some(Arc::clone(&info)));
                *self.last_error.lock().expect("poller lock poisoned") = None;
                // `send_replace` stores even with no subscribers; `send`
                // would drop the update and leave `is_healthy()` stale.
                self.healthy.send_replace(true);
                self.last_updated.send_replace(Some(Utc::now()));
                debug!(device = ?info.device_name(), "device status refreshed");
                Ok(info)
            }
            Err(e) => {
                let err = CoreError::from(e);
                *self.last_error.lock().expect("poller lock poisoned") = Some(err.to_string());
                self.healthy.send_replace(false);
                warn!(error = %err, "device poll failed; keeping previous snapshot");
                Err(err)
            }
        };

        // Completion is observable (and listeners run) on both paths.
        self.cycle.send_modify(|c| *c += 1);
        self.listeners.notify_all();

        outcome
    }

    /// Outcome of the most recently completed cycle, for coalesced waiters.
    fn current_outcome(&self) -> Result<Arc<DeviceInfo>, CoreError> {
        if self.is_healthy() {
            self.snapshot.load_full().ok_or(CoreError::Unavailable {
                reason: "no snapshot published".to_owned(),
            })
        } else {
            let reason = self
                .last_error
                .lock()
                .expect("poller lock poisoned")
                .clone()
                .unwrap_or_else(|| "poll failed".to_owned());
            Err(CoreError::Unavailable { reason })
        }
    }
}

/// Background task: poll on a fixed period until cancelled.
///
/// Poll failures degrade health but never end the task; the connection
/// stays degraded until the device is reachable again.
pub(crate) async fn poll_task(poller: Arc<Poller>, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; setup already polled.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let _ = poller.request_refresh().await;
            }
        }
    }
    debug!("poll task stopped");
}
