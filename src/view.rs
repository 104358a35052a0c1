//! Dashboard view model.
//!
//! Pure functions from a [`PlantStore`] snapshot to the serializable shapes
//! the front end renders: summary stats, the environment panel, plant cards
//! and the plant detail panel.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classifier::classify;
use crate::models::{AmbientReading, PlantReading, Severity};
use crate::store::PlantStore;

// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_plants: usize,
    pub healthy_plants: usize,
    /// Plants in `warning` or `critical`.
    pub attention_plants: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentView {
    pub temperature: String,
    pub humidity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantCard {
    pub id: u32,
    pub name: String,
    pub image_url: String,
    pub status: Severity,
    pub temperature: String,
    pub humidity: String,
    pub soil_moisture: String,
    pub soil_raw: i64,
    pub moisture_label: &'static str,
    pub moisture_class: Severity,
    pub last_updated: DateTime<Utc>,
}

/// Card plus the progress-bar widths shown in the detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDetail {
    #[serde(flatten)]
    pub card: PlantCard,
    pub humidity_percent: f64,
    pub soil_moisture_percent: f64,
    pub air_sensor: &'static str,
}

/// How fresh the store is. `stale_seconds` is `None` before the first sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncHealth {
    pub last_sync: Option<DateTime<Utc>>,
    pub stale_seconds: Option<i64>,
}

pub fn stats(store: &PlantStore) -> Stats {
    // ---
    let plants = store.plants();
    Stats {
        total_plants: plants.len(),
        healthy_plants: plants.iter().filter(|p| p.status == Severity::Healthy).count(),
        attention_plants: plants.iter().filter(|p| p.status.needs_attention()).count(),
    }
}

pub fn environment(ambient: AmbientReading) -> EnvironmentView {
    EnvironmentView {
        temperature: celsius(ambient.temperature),
        humidity: percent(ambient.humidity),
    }
}

pub fn card(plant: &PlantReading) -> PlantCard {
    // ---
    let moisture = classify(plant.soil_moisture);
    PlantCard {
        id: plant.id,
        name: plant.name.clone(),
        image_url: plant.image_url.clone(),
        status: plant.status,
        temperature: celsius(plant.temperature),
        humidity: percent(plant.humidity),
        soil_moisture: percent(plant.soil_moisture),
        soil_raw: plant.soil_raw,
        moisture_label: moisture.label,
        moisture_class: moisture.severity,
        last_updated: plant.last_updated,
    }
}

pub fn detail(plant: &PlantReading) -> PlantDetail {
    PlantDetail {
        card: card(plant),
        humidity_percent: bar_width(plant.humidity),
        soil_moisture_percent: bar_width(plant.soil_moisture),
        air_sensor: "Shared DHT sensor",
    }
}

pub fn cards(store: &PlantStore) -> Vec<PlantCard> {
    store.plants().iter().map(card).collect()
}

pub fn sync_health(store: &PlantStore, now: DateTime<Utc>) -> SyncHealth {
    // ---
    let last_sync = store.last_sync();
    SyncHealth {
        last_sync,
        stale_seconds: last_sync.map(|t| (now - t).num_seconds().max(0)),
    }
}

fn celsius(value: f64) -> String {
    format!("{:.1}°C", value)
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

// Progress bars cannot render outside 0..=100 even though readings can.
fn bar_width(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
