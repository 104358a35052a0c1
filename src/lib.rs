//! `plant-monitor`: dashboard service for a plant-monitoring device.
//!
//! The crate follows the Explicit Module Boundary Pattern (EMBP): each module
//! owns one concern and the crate root re-exports the handful of types the
//! binary and the route modules need.
//! - `classifier` – soil moisture to status
//! - `store` – in-memory plant readings and ambient reading
//! - `device` – HTTP client for the device API
//! - `sync` – periodic fetch-and-merge loop
//! - `view` – serializable dashboard view model
//! - `dashboard` – view mode, setup flow, sync lifecycle
//! - `routes` – HTTP gateway

pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod device;
pub mod models;
pub mod routes;
pub mod store;
pub mod sync;
pub mod view;

pub use config::Config;
pub use dashboard::Dashboard;
pub use device::{DeviceApi, DeviceError, HttpDevice};
pub use models::{AmbientReading, PlantReading, RawPlantReading, Severity};
pub use store::{PlantStore, SharedStore};
