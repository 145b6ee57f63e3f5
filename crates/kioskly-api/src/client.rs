// Hand-crafted async HTTP client for the Fully Kiosk remote admin API.
//
// Single-endpoint protocol: every operation is
//   GET /?cmd=<command>&type=json&password=<pw>[&key=value...]
// The device answers HTTP 200 for almost everything; failures arrive as a
// `{"status": "Error", "statustext": "..."}` JSON envelope instead of an
// HTTP error status, so envelope inspection is the real error path here.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::info::DeviceInfo;
use crate::transport::TransportConfig;

// ── Command response envelope ─────────────────────────────────────────

#[derive(serde::Deserialize)]
struct CommandResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    statustext: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one Fully Kiosk Browser device.
///
/// Cheap to clone is deliberately NOT provided — `kioskly-core` wraps the
/// client in an `Arc` and shares it between the poller and entity adapters.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    password: SecretString,
}

impl DeviceClient {
    /// Build a client for `http://{host}:{port}` with the remote admin password.
    pub fn new(
        host: &str,
        port: u16,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}:{port}/"))?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            password,
        })
    }

    /// Wrap an existing `reqwest::Client` and base URL (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url, password: SecretString) -> Self {
        Self {
            http,
            base_url,
            password,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Status queries ───────────────────────────────────────────────

    /// Fetch the full device status map (`cmd=deviceInfo`).
    pub async fn device_info(&self) -> Result<DeviceInfo, Error> {
        self.query("deviceInfo", &[]).await
    }

    /// Fetch the device's current settings (`cmd=listSettings`).
    pub async fn list_settings(&self) -> Result<Value, Error> {
        self.query("listSettings", &[]).await
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Set a string-valued configuration setting (`cmd=setStringSetting`).
    pub async fn set_string_setting(&self, key: &str, value: &str) -> Result<(), Error> {
        self.command("setStringSetting", &[("key", key), ("value", value)])
            .await
    }

    /// Set a boolean-valued configuration setting (`cmd=setBooleanSetting`).
    pub async fn set_boolean_setting(&self, key: &str, value: bool) -> Result<(), Error> {
        let value = if value { "true" } else { "false" };
        self.command("setBooleanSetting", &[("key", key), ("value", value)])
            .await
    }

    // ── Screen ───────────────────────────────────────────────────────

    pub async fn screen_on(&self) -> Result<(), Error> {
        self.command("screenOn", &[]).await
    }

    pub async fn screen_off(&self) -> Result<(), Error> {
        self.command("screenOff", &[]).await
    }

    /// Set screen brightness (device range 0-255) via the string setting.
    pub async fn set_screen_brightness(&self, level: u8) -> Result<(), Error> {
        self.set_string_setting("screenBrightness", &level.to_string())
            .await
    }

    pub async fn start_screensaver(&self) -> Result<(), Error> {
        self.command("startScreensaver", &[]).await
    }

    pub async fn stop_screensaver(&self) -> Result<(), Error> {
        self.command("stopScreensaver", &[]).await
    }

    // ── Media ────────────────────────────────────────────────────────

    /// Play an audio file by URL on the device (`cmd=playSound`).
    pub async fn play_sound(&self, url: &str) -> Result<(), Error> {
        self.command("playSound", &[("url", url)]).await
    }

    pub async fn stop_sound(&self) -> Result<(), Error> {
        self.command("stopSound", &[]).await
    }

    // ── Browser & app ────────────────────────────────────────────────

    /// Navigate the kiosk browser to `url`.
    pub async fn load_url(&self, url: &str) -> Result<(), Error> {
        self.command("loadUrl", &[("url", url)]).await
    }

    /// Navigate back to the configured start URL.
    pub async fn load_start_url(&self) -> Result<(), Error> {
        self.command("loadStartUrl", &[]).await
    }

    pub async fn restart_app(&self) -> Result<(), Error> {
        self.command("restartApp", &[]).await
    }

    pub async fn to_foreground(&self) -> Result<(), Error> {
        self.command("toForeground", &[]).await
    }

    // ── Request plumbing ─────────────────────────────────────────────

    /// Issue a query command and deserialize its JSON payload.
    ///
    /// Auth failures still arrive as a `status: Error` envelope with
    /// HTTP 200, so the body is inspected before deserializing into `T`.
    async fn query<T: DeserializeOwned>(
        &self,
        cmd: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let body = self.send(cmd, params).await?;
        Self::check_envelope(cmd, &body)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Issue a mutating command and unwrap the status envelope.
    async fn command(&self, cmd: &str, params: &[(&str, &str)]) -> Result<(), Error> {
        let body = self.send(cmd, params).await?;
        Self::check_envelope(cmd, &body)
    }

    async fn send(&self, cmd: &str, params: &[(&str, &str)]) -> Result<String, Error> {
        debug!(cmd, "GET {}", self.base_url);

        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("cmd", cmd), ("type", "json")])
            .query(params)
            .query(&[("password", self.password.expose_secret())])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            })
        }
    }

    /// Reject bodies carrying the `{"status": "Error"}` envelope.
    fn check_envelope(cmd: &str, body: &str) -> Result<(), Error> {
        let Ok(envelope) = serde_json::from_str::<CommandResponse>(body) else {
            // Not an object at all; let the caller's deserializer complain.
            return Ok(());
        };

        if envelope.status.as_deref() == Some("Error") {
            let message = envelope
                .statustext
                .unwrap_or_else(|| "unspecified device error".to_owned());
            let lowered = message.to_lowercase();
            if lowered.contains("login") || lowered.contains("password") {
                return Err(Error::Authentication { message });
            }
            return Err(Error::Command {
                command: cmd.to_owned(),
                message,
            });
        }

        Ok(())
    }
}
