// ── Core error types ──
//
// User-facing errors from kioskly-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<kioskly_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach kiosk at {host}: {reason}")]
    ConnectionFailed { host: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The first poll at setup failed; the connection was never established.
    #[error("Kiosk not ready: {reason}")]
    NotReady { reason: String },

    /// The last poll failed; the previous snapshot (if any) is stale.
    #[error("Kiosk unavailable: {reason}")]
    Unavailable { reason: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed device response: {message}")]
    MalformedResponse { message: String },

    // ── Service errors ───────────────────────────────────────────────
    /// A service call referenced an entity no connection owns.
    #[error("Unknown entity: {entity_id}")]
    UnknownEntity { entity_id: String },

    /// The device accepted the request but rejected the command.
    #[error("Command rejected by device: {message}")]
    Rejected { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Connection is shutting down")]
    ShuttingDown,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kioskly_api::Error> for CoreError {
    fn from(err: kioskly_api::Error) -> Self {
        match err {
            kioskly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            kioskly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else {
                    CoreError::ConnectionFailed {
                        host: e
                            .url()
                            .and_then(|u| u.host_str())
                            .unwrap_or("<unknown>")
                            .to_owned(),
                        reason: e.to_string(),
                    }
                }
            }
            kioskly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            kioskly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            kioskly_api::Error::Command { message, .. } => CoreError::Rejected { message },
            kioskly_api::Error::Api { status, message } => CoreError::ConnectionFailed {
                host: String::new(),
                reason: format!("HTTP {status}: {message}"),
            },
            kioskly_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
