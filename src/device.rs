//! HTTP client for the plant-monitoring device.
//!
//! The device exposes three JSON endpoints:
//! - `GET  /api/status`   – Wi-Fi configuration state
//! - `POST /api/savewifi` – store station credentials
//! - `GET  /api/plants`   – current per-plant readings
//!
//! [`DeviceApi`] is the seam the sync loop and HTTP layer talk to, so tests
//! can substitute a fake device.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{DeviceStatus, RawPlantReading, WifiCredentials, WifiSaveResponse};

// ---

#[derive(Debug, Error)]
pub enum DeviceError {
    /// Request could not be sent, timed out, or came back non-2xx.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// Body arrived but is not the shape the endpoint promises.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait DeviceApi: Send + Sync {
    // ---
    async fn status(&self) -> Result<DeviceStatus, DeviceError>;

    async fn save_wifi(
        &self,
        credentials: &WifiCredentials,
    ) -> Result<WifiSaveResponse, DeviceError>;

    async fn plants(&self) -> Result<Vec<RawPlantReading>, DeviceError>;
}

/// [`DeviceApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDevice {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDevice {
    /// Build a client for the device at `base_url`; every request is bounded
    /// by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build device HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DeviceError> {
        // ---
        let response = request
            .send()
            .await
            .map_err(|e| DeviceError::NetworkFailure(format!("{}: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::NetworkFailure(format!(
                "{} returned {}",
                path, status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DeviceError::NetworkFailure(format!("{}: {}", path, e)))?;

        tracing::trace!("{} raw response: {}", path, String::from_utf8_lossy(&body));

        serde_json::from_slice(&body)
            .map_err(|e| DeviceError::MalformedResponse(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl DeviceApi for HttpDevice {
    // ---
    async fn status(&self) -> Result<DeviceStatus, DeviceError> {
        let path = "/api/status";
        self.read_json(path, self.client.get(self.url(path))).await
    }

    async fn save_wifi(
        &self,
        credentials: &WifiCredentials,
    ) -> Result<WifiSaveResponse, DeviceError> {
        // ---
        let path = "/api/savewifi";
        tracing::info!("Sending Wi-Fi credentials for SSID '{}'", credentials.ssid);
        self.read_json(path, self.client.post(self.url(path)).json(credentials))
            .await
    }

    async fn plants(&self) -> Result<Vec<RawPlantReading>, DeviceError> {
        let path = "/api/plants";
        self.read_json(path, self.client.get(self.url(path))).await
    }
}
