//! Periodic fetch-and-merge loop.
//!
//! Every tick fetches `GET /api/plants` and merges the result into the
//! shared store. The first tick fires immediately on activation. Failed
//! fetches are logged and leave the store untouched; the next regular tick
//! is the retry.
//!
//! Fetches run inline in the loop task, so ticks never overlap: ticks that
//! elapse while a fetch is outstanding are skipped, and aborting the loop
//! also cancels the fetch it is waiting on. Each fetch still carries a
//! sequence number so a late response can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::device::{DeviceApi, DeviceError};
use crate::store::{SharedStore, SnapshotOutcome};

// ---

#[derive(Clone)]
pub struct SyncLoop {
    device: Arc<dyn DeviceApi>,
    store: SharedStore,
    interval: Duration,
    next_seq: Arc<AtomicU64>,
}

impl SyncLoop {
    // ---
    pub fn new(device: Arc<dyn DeviceApi>, store: SharedStore, interval: Duration) -> Self {
        Self {
            device,
            store,
            interval,
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch once and merge. Errors are returned, not logged.
    pub async fn sync_once(&self) -> Result<SnapshotOutcome, DeviceError> {
        // ---
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let readings = self.device.plants().await?;

        let outcome = self.store.write().await.apply_snapshot(seq, &readings);
        match outcome {
            SnapshotOutcome::Applied { merged } => {
                tracing::debug!(
                    "Sync #{} merged {} of {} readings",
                    seq,
                    merged,
                    readings.len()
                );
            }
            SnapshotOutcome::Stale { latest } => {
                tracing::debug!("Sync #{} discarded: #{} already applied", seq, latest);
            }
        }
        Ok(outcome)
    }

    /// One sync tick: fetch, merge, and swallow the error after logging it.
    async fn tick(&self) {
        // ---
        if let Err(e) = self.sync_once().await {
            tracing::warn!("Sync tick abandoned: {}", e);
        }
    }

    /// Start ticking on the current runtime. The first tick runs immediately.
    pub fn spawn(self) -> SyncHandle {
        // ---
        tracing::info!("Starting sensor sync ({:?} interval)", self.interval);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                self.tick().await;
            }
        });

        SyncHandle { handle }
    }
}

/// Owner of a running sync loop. Dropping it stops the loop, including a
/// fetch that is still outstanding.
#[derive(Debug)]
pub struct SyncHandle {
    handle: JoinHandle<()>,
}

impl SyncHandle {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::{DeviceStatus, RawPlantReading, Severity, WifiCredentials, WifiSaveResponse};
    use crate::store::PlantStore;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Fake device that serves a fixed reading list or a fixed failure.
    struct FakeDevice {
        response: Result<Vec<RawPlantReading>, &'static str>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl FakeDevice {
        fn ok(readings: Vec<RawPlantReading>) -> Self {
            Self {
                response: Ok(readings),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(readings: Vec<RawPlantReading>, gate: Arc<Notify>) -> Self {
            Self {
                response: Ok(readings),
                calls: AtomicUsize::new(0),
                gate: Some(gate),
            }
        }

        fn failing(reason: &'static str) -> Self {
            Self {
                response: Err(reason),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl DeviceApi for FakeDevice {
        async fn status(&self) -> Result<DeviceStatus, DeviceError> {
            Ok(DeviceStatus {
                wifi_configured: true,
                ssid: "test".to_string(),
            })
        }

        async fn save_wifi(&self, _c: &WifiCredentials) -> Result<WifiSaveResponse, DeviceError> {
            Ok(WifiSaveResponse {
                success: true,
                message: String::new(),
            })
        }

        async fn plants(&self) -> Result<Vec<RawPlantReading>, DeviceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.response {
                Ok(readings) => Ok(readings.clone()),
                Err(reason) => Err(DeviceError::NetworkFailure(reason.to_string())),
            }
        }
    }

    fn sample() -> Vec<RawPlantReading> {
        // ---
        vec![RawPlantReading {
            temperature: 22.5,
            humidity: 55.0,
            soil_moisture: 25.0,
            soil_raw: 410,
            status: "critical".to_string(),
        }]
    }

    #[tokio::test]
    async fn test_successful_sync_merges_and_sets_ambient() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let sync = SyncLoop::new(
            Arc::new(FakeDevice::ok(sample())),
            store.clone(),
            Duration::from_secs(5),
        );

        let outcome = sync.sync_once().await.unwrap();
        assert_eq!(outcome, SnapshotOutcome::Applied { merged: 1 });

        let store = store.read().await;
        assert_eq!(store.plants()[0].status, Severity::Critical);
        assert_eq!(store.plants()[0].soil_raw, 410);
        assert_eq!(store.ambient().temperature, 22.5);
        assert_eq!(store.ambient().humidity, 55.0);
    }

    #[tokio::test]
    async fn test_failed_sync_leaves_store_unchanged() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let before = store.read().await.clone();
        let sync = SyncLoop::new(
            Arc::new(FakeDevice::failing("connection refused")),
            store.clone(),
            Duration::from_secs(5),
        );

        let err = sync.sync_once().await.unwrap_err();
        assert!(matches!(err, DeviceError::NetworkFailure(_)));
        assert_eq!(*store.read().await, before);

        // The swallowing tick path must not panic either.
        sync.tick().await;
        assert_eq!(*store.read().await, before);
    }

    #[tokio::test]
    async fn test_sequence_numbers_increase() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let sync = SyncLoop::new(
            Arc::new(FakeDevice::ok(sample())),
            store.clone(),
            Duration::from_secs(5),
        );

        sync.sync_once().await.unwrap();
        sync.sync_once().await.unwrap();
        assert_eq!(store.read().await.applied_seq(), 2);
    }

    #[tokio::test]
    async fn test_spawned_loop_fetches_immediately() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let device = Arc::new(FakeDevice::ok(sample()));
        let handle = SyncLoop::new(device.clone(), store.clone(), Duration::from_secs(3600)).spawn();

        for _ in 0..100 {
            if store.read().await.last_sync().is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(handle.is_running());
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.read().await.plants()[0].soil_moisture, 25.0);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_skipped_while_fetch_in_flight() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let gate = Arc::new(Notify::new());
        let device = Arc::new(FakeDevice::gated(sample(), gate.clone()));
        let _handle = SyncLoop::new(device.clone(), store.clone(), Duration::from_secs(5)).spawn();

        // Three intervals elapse while the first fetch is still blocked.
        tokio::time::sleep(Duration::from_secs(16)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
        assert!(store.read().await.last_sync().is_none());

        gate.notify_one();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(store.read().await.last_sync().is_some());
    }

    #[tokio::test]
    async fn test_empty_response_keeps_ambient_and_advances_last_sync() {
        // ---
        let store = PlantStore::seeded().into_shared();
        store.write().await.set_ambient(18.0, 60.0);
        let before = store.read().await.clone();
        let sync = SyncLoop::new(
            Arc::new(FakeDevice::ok(Vec::new())),
            store.clone(),
            Duration::from_secs(5),
        );

        let outcome = sync.sync_once().await.unwrap();
        assert_eq!(outcome, SnapshotOutcome::Applied { merged: 0 });

        let store = store.read().await;
        assert_eq!(store.ambient(), before.ambient());
        assert_eq!(store.plants(), before.plants());
        assert!(before.last_sync().is_none());
        assert!(store.last_sync().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_outstanding_fetch() {
        // ---
        let store = PlantStore::seeded().into_shared();
        let before = store.read().await.clone();
        let gate = Arc::new(Notify::new());
        let device = Arc::new(FakeDevice::gated(sample(), gate.clone()));
        let handle = SyncLoop::new(device.clone(), store.clone(), Duration::from_secs(5)).spawn();

        // Let the immediate tick reach the device and block there.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);

        handle.stop();
        drop(handle);
        tokio::time::sleep(Duration::from_secs(1)).await;
        gate.notify_one();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*store.read().await, before);
    }
}
