//! CLI error types with miette diagnostics.
//!
//! Maps core and API errors into user-facing errors with actionable help.

use miette::Diagnostic;
use thiserror::Error;

use kioskly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach device at {host}")]
    #[diagnostic(
        code(kioskly::connection_failed),
        help(
            "Check that the device is on the network and remote administration\n\
             is enabled in Fully Kiosk (Settings > Remote Administration).\n\
             Host: {host}"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Device did not answer its first poll: {reason}")]
    #[diagnostic(
        code(kioskly::not_ready),
        help("The device must answer one status poll before entities exist.")
    )]
    NotReady { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(kioskly::auth_failed),
        help(
            "Verify the remote admin password.\n\
             Pass it with --password or set KIOSKLY_PASSWORD."
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(kioskly::no_credentials),
        help(
            "Add `password = \"...\"` to the profile, pass --password,\n\
             or set KIOSKLY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Device rejected the command: {message}")]
    #[diagnostic(code(kioskly::rejected))]
    Rejected { message: String },

    #[error("Device sent a malformed response: {message}")]
    #[diagnostic(
        code(kioskly::malformed),
        help("The device may be running an old Fully Kiosk version.")
    )]
    Malformed { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kioskly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(kioskly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: kioskly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(kioskly::no_config),
        help(
            "Pass --host, set KIOSKLY_HOST, or create a config file with:\n\
             kioskly config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(kioskly::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(kioskly::timeout),
        help("Increase timeout with --timeout or check device responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(kioskly::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not write config file: {0}")]
    #[diagnostic(code(kioskly::toml))]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::NotReady { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { host, reason } => {
                CliError::ConnectionFailed { host, reason }
            }
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotReady { reason } => CliError::NotReady { reason },
            CoreError::Unavailable { reason } => CliError::ConnectionFailed {
                host: "(unavailable)".into(),
                reason,
            },
            CoreError::MalformedResponse { message } => CliError::Malformed { message },
            CoreError::UnknownEntity { entity_id } => CliError::Validation {
                field: "entity".into(),
                reason: format!("unknown entity '{entity_id}'"),
            },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::ShuttingDown => CliError::Rejected {
                message: "connection is shutting down".into(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── API error → CliError mapping ─────────────────────────────────────

impl From<kioskly_api::Error> for CliError {
    fn from(err: kioskly_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
