// ── Device status payload ──
//
// `cmd=deviceInfo` returns one flat JSON object of heterogeneous values.
// DeviceInfo wraps that map without reshaping it: the key set varies across
// app versions and Android devices, so typed accessors sit on top of the
// raw map instead of a rigid struct.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status snapshot from a Fully Kiosk device.
///
/// Immutable once constructed; consumers read fields through the typed
/// accessors or [`get`](Self::get) for anything not covered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceInfo {
    fields: Map<String, Value>,
}

impl DeviceInfo {
    /// Wrap a raw key/value map (used by tests and the client).
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw field access for keys without a dedicated accessor.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.fields.get(key).and_then(Value::as_bool)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn device_name(&self) -> Option<&str> {
        self.get_str("deviceName")
    }

    pub fn device_id(&self) -> Option<&str> {
        self.get_str("deviceID")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.get_str("deviceManufacturer")
    }

    pub fn model(&self) -> Option<&str> {
        self.get_str("deviceModel")
    }

    pub fn app_version(&self) -> Option<&str> {
        self.get_str("appVersionName")
    }

    pub fn android_version(&self) -> Option<&str> {
        self.get_str("androidVersion")
    }

    // ── Power & display ──────────────────────────────────────────────

    pub fn battery_level(&self) -> Option<f64> {
        self.get_f64("batteryLevel")
    }

    pub fn plugged(&self) -> Option<bool> {
        self.get_bool("plugged")
    }

    pub fn screen_on(&self) -> Option<bool> {
        self.get_bool("isScreenOn")
    }

    /// Screen brightness, device range 0-255.
    pub fn screen_brightness(&self) -> Option<f64> {
        self.get_f64("screenBrightness")
    }

    pub fn in_screensaver(&self) -> Option<bool> {
        self.get_bool("isInScreensaver")
    }

    // ── App & browser state ──────────────────────────────────────────

    pub fn kiosk_mode(&self) -> Option<bool> {
        self.get_bool("kioskMode")
    }

    pub fn in_foreground(&self) -> Option<bool> {
        self.get_bool("isInForeground")
    }

    pub fn current_page(&self) -> Option<&str> {
        self.get_str("currentPage")
    }

    pub fn start_url(&self) -> Option<&str> {
        self.get_str("startUrl")
    }

    // ── Network ──────────────────────────────────────────────────────

    pub fn ip4(&self) -> Option<&str> {
        self.get_str("ip4")
    }

    pub fn ssid(&self) -> Option<&str> {
        // Older app versions report "SSID", newer ones "ssid".
        self.get_str("ssid").or_else(|| self.get_str("SSID"))
    }

    pub fn wifi_signal_level(&self) -> Option<f64> {
        self.get_f64("wifiSignalLevel")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DeviceInfo {
        serde_json::from_value(json!({
            "deviceName": "Lobby Tablet",
            "deviceID": "abc123def456",
            "deviceManufacturer": "samsung",
            "deviceModel": "SM-T510",
            "appVersionName": "1.42.5",
            "batteryLevel": 87,
            "plugged": true,
            "isScreenOn": false,
            "screenBrightness": 96,
            "kioskMode": true,
            "SSID": "\"office\"",
            "ip4": "192.168.1.87"
        }))
        .unwrap()
    }

    #[test]
    fn typed_accessors() {
        let info = sample();
        assert_eq!(info.device_name(), Some("Lobby Tablet"));
        assert_eq!(info.battery_level(), Some(87.0));
        assert_eq!(info.plugged(), Some(true));
        assert_eq!(info.screen_on(), Some(false));
        assert_eq!(info.screen_brightness(), Some(96.0));
    }

    #[test]
    fn missing_fields_are_none() {
        let info = sample();
        assert!(info.in_screensaver().is_none());
        assert!(info.wifi_signal_level().is_none());
    }

    #[test]
    fn ssid_falls_back_to_uppercase_key() {
        let info = sample();
        assert_eq!(info.ssid(), Some("\"office\""));
    }

    #[test]
    fn roundtrips_through_serde() {
        let info = sample();
        let text = serde_json::to_string(&info).unwrap();
        let back: DeviceInfo = serde_json::from_str(&text).unwrap();
        assert_eq!(back.device_id(), Some("abc123def456"));
    }
}
