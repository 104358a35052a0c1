//! Dashboard service: view mode, setup flow, and sync loop lifecycle.
//!
//! At startup the device's `GET /api/status` decides whether the dashboard
//! starts in setup mode (no Wi-Fi credentials yet) or dashboard mode. The
//! sync loop is activated the first time the dashboard mode is entered and
//! then runs until the service is shut down.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::device::{DeviceApi, DeviceError};
use crate::models::{WifiCredentials, WifiSaveResponse};
use crate::store::SharedStore;
use crate::sync::{SyncHandle, SyncLoop};
use crate::view::{self, EnvironmentView, PlantCard, Stats, SyncHealth};

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Setup,
    Dashboard,
}

/// Wi-Fi badge shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiBadge {
    pub connected: bool,
    pub label: String,
}

impl WifiBadge {
    fn connected(ssid: &str) -> Self {
        Self {
            connected: true,
            label: format!("Connected to {}", ssid),
        }
    }

    fn disconnected(label: &str) -> Self {
        Self {
            connected: false,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub mode: ViewMode,
    pub wifi: WifiBadge,
    pub stats: Stats,
    pub environment: EnvironmentView,
    pub plants: Vec<PlantCard>,
    pub sync: SyncHealth,
}

/// Why a Wi-Fi setup request did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Please enter both SSID and password")]
    MissingFields,

    #[error("Failed to connect: {0}")]
    Rejected(String),

    #[error("Connection error. Please try again.")]
    Device(#[from] DeviceError),
}

struct Session {
    mode: ViewMode,
    wifi: WifiBadge,
}

#[derive(Clone)]
pub struct Dashboard {
    store: SharedStore,
    device: Arc<dyn DeviceApi>,
    sync_interval: Duration,
    session: Arc<RwLock<Session>>,
    sync: Arc<Mutex<Option<SyncHandle>>>,
}

impl Dashboard {
    // ---
    pub fn new(store: SharedStore, device: Arc<dyn DeviceApi>, sync_interval: Duration) -> Self {
        Self {
            store,
            device,
            sync_interval,
            session: Arc::new(RwLock::new(Session {
                mode: ViewMode::Setup,
                wifi: WifiBadge::disconnected("Not Connected"),
            })),
            sync: Arc::new(Mutex::new(None)),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Probe the device once and pick the initial view mode.
    ///
    /// An unreachable device is not fatal: the dashboard starts in setup mode.
    pub async fn init(&self) -> ViewMode {
        // ---
        match self.device.status().await {
            Ok(status) if status.wifi_configured => {
                tracing::info!("Device already on Wi-Fi '{}'", status.ssid);
                self.session.write().await.wifi = WifiBadge::connected(&status.ssid);
                self.activate().await;
            }
            Ok(_) => {
                tracing::info!("Device has no Wi-Fi credentials, starting in setup mode");
                let mut session = self.session.write().await;
                session.mode = ViewMode::Setup;
                session.wifi = WifiBadge::disconnected("Access Point");
            }
            Err(e) => {
                tracing::error!("Error checking device Wi-Fi status: {}", e);
                let mut session = self.session.write().await;
                session.mode = ViewMode::Setup;
                session.wifi = WifiBadge::disconnected("Not Connected");
            }
        }
        self.mode().await
    }

    /// Switch to dashboard mode, starting the sync loop if it is not running.
    pub async fn activate(&self) {
        // ---
        self.session.write().await.mode = ViewMode::Dashboard;

        let mut sync = self.sync.lock().await;
        if sync.as_ref().is_some_and(SyncHandle::is_running) {
            return;
        }
        let sync_loop = SyncLoop::new(self.device.clone(), self.store.clone(), self.sync_interval);
        *sync = Some(sync_loop.spawn());
    }

    /// Forward credentials to the device; on success enter dashboard mode.
    pub async fn save_wifi(
        &self,
        credentials: &WifiCredentials,
    ) -> Result<WifiSaveResponse, SetupError> {
        // ---
        if !credentials.is_complete() {
            return Err(SetupError::MissingFields);
        }

        let response = self.device.save_wifi(credentials).await?;
        if !response.success {
            tracing::warn!("Device rejected Wi-Fi credentials: {}", response.message);
            return Err(SetupError::Rejected(response.message));
        }

        tracing::info!("Device joined Wi-Fi '{}'", credentials.ssid);
        self.session.write().await.wifi = WifiBadge::connected(&credentials.ssid);
        self.activate().await;
        Ok(response)
    }

    /// Return to setup mode. The sync loop keeps running.
    pub async fn reset_wifi(&self) {
        self.session.write().await.mode = ViewMode::Setup;
    }

    pub async fn mode(&self) -> ViewMode {
        self.session.read().await.mode
    }

    pub async fn is_syncing(&self) -> bool {
        self.sync
            .lock()
            .await
            .as_ref()
            .is_some_and(SyncHandle::is_running)
    }

    /// Stop the sync loop, if any.
    pub async fn shutdown(&self) {
        // ---
        if let Some(handle) = self.sync.lock().await.take() {
            tracing::info!("Stopping sensor sync");
            handle.stop();
        }
    }

    pub async fn view(&self) -> DashboardView {
        // ---
        let (mode, wifi) = {
            let session = self.session.read().await;
            (session.mode, session.wifi.clone())
        };

        let store = self.store.read().await;
        DashboardView {
            mode,
            wifi,
            stats: view::stats(&store),
            environment: view::environment(store.ambient()),
            plants: view::cards(&store),
            sync: view::sync_health(&store, Utc::now()),
        }
    }
}
