//! Data models for the plant monitor.
//!
//! Wire types mirror the JSON the device speaks (camelCase); domain types
//! are what the state store holds and the presentation layer reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---

/// One element of the `GET /api/plants` array reported by the device.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlantReading {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    /// Any JSON number is accepted; fractions are truncated.
    #[serde(deserialize_with = "number_as_i64")]
    pub soil_raw: i64,
    /// The device's own classification. Never trusted; status is re-derived
    /// from `soil_moisture`.
    #[serde(default)]
    pub status: String,
}

fn number_as_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let value = f64::deserialize(deserializer)?;
    Ok(value.trunc() as i64)
}

/// Response of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub wifi_configured: bool,
    #[serde(default)]
    pub ssid: String,
}

/// Body of `POST /api/savewifi`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WifiCredentials {
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub password: String,
}

impl WifiCredentials {
    pub fn is_complete(&self) -> bool {
        !self.ssid.is_empty() && !self.password.is_empty()
    }
}

/// Response of `POST /api/savewifi`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WifiSaveResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Derived plant health, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Healthy,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Healthy => "healthy",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Anything but `Healthy` counts towards the "needs attention" tally.
    pub fn needs_attention(&self) -> bool {
        !matches!(self, Severity::Healthy)
    }
}

/// Current known state of one monitored plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantReading {
    // ---
    pub id: u32,
    pub name: String,
    pub image_url: String,
    /// Shared ambient value, copied into every plant on merge.
    pub temperature: f64,
    /// Shared ambient value, copied into every plant on merge.
    pub humidity: f64,
    pub soil_moisture: f64,
    pub soil_raw: i64,
    pub status: Severity,
    pub last_updated: DateTime<Utc>,
}

impl PlantReading {
    // ---
    pub fn new(id: u32, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: image_url.into(),
            temperature: 0.0,
            humidity: 0.0,
            soil_moisture: 0.0,
            soil_raw: 0,
            status: Severity::Healthy,
            last_updated: Utc::now(),
        }
    }
}

/// Process-wide temperature and humidity from the device's single air sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AmbientReading {
    pub temperature: f64,
    pub humidity: f64,
}
