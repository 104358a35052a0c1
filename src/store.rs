//! In-memory state store for plant readings.
//!
//! Constructed once at startup and shared as a [`SharedStore`] handle with
//! the sync loop (the only writer of readings) and the HTTP layer (readers,
//! plus image replacement).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::classifier::classify;
use crate::models::{AmbientReading, PlantReading, RawPlantReading};

// ---

pub type SharedStore = Arc<RwLock<PlantStore>>;

/// Result of offering a sync snapshot to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Snapshot merged; `merged` readings landed on a known plant.
    Applied { merged: usize },
    /// A snapshot with an equal or newer sequence number was already applied.
    Stale { latest: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantStore {
    // ---
    plants: Vec<PlantReading>,
    ambient: AmbientReading,
    applied_seq: u64,
    last_sync: Option<DateTime<Utc>>,
}

impl PlantStore {
    // ---
    pub fn new(plants: Vec<PlantReading>) -> Self {
        Self {
            plants,
            ambient: AmbientReading::default(),
            applied_seq: 0,
            last_sync: None,
        }
    }

    /// The three plants the dashboard monitors out of the box.
    pub fn seeded() -> Self {
        // ---
        Self::new(vec![
            PlantReading::new(1, "Monstera Deliciosa", placeholder_image("%2310b981", 1)),
            PlantReading::new(2, "Snake Plant", placeholder_image("%23059669", 2)),
            PlantReading::new(3, "Peace Lily", placeholder_image("%2322c55e", 3)),
        ])
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn plants(&self) -> &[PlantReading] {
        &self.plants
    }

    pub fn ambient(&self) -> AmbientReading {
        self.ambient
    }

    pub fn get(&self, id: u32) -> Option<&PlantReading> {
        self.plants.iter().find(|p| p.id == id)
    }

    /// Time the most recent snapshot was applied, if any.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// Overwrite the readings of the plant at `index` and re-derive its status.
    ///
    /// Returns `false` (and changes nothing) when `index` is out of range.
    pub fn merge_at(&mut self, index: usize, delta: &RawPlantReading) -> bool {
        self.merge_at_time(index, delta, Utc::now())
    }

    fn merge_at_time(&mut self, index: usize, delta: &RawPlantReading, now: DateTime<Utc>) -> bool {
        // ---
        let Some(plant) = self.plants.get_mut(index) else {
            tracing::debug!(
                "Ignoring reading at index {}: only {} plants configured",
                index,
                self.plants.len()
            );
            return false;
        };

        plant.temperature = delta.temperature;
        plant.humidity = delta.humidity;
        plant.soil_moisture = delta.soil_moisture;
        plant.soil_raw = delta.soil_raw;
        plant.status = classify(delta.soil_moisture).severity;
        plant.last_updated = plant.last_updated.max(now);
        true
    }

    pub fn set_ambient(&mut self, temperature: f64, humidity: f64) {
        self.ambient = AmbientReading {
            temperature,
            humidity,
        };
    }

    /// Replace the image of plant `id`, returning the updated plant, or
    /// `None` if there is no such plant.
    pub fn replace_image(&mut self, id: u32, image_url: impl Into<String>) -> Option<&PlantReading> {
        // ---
        let plant = self.plants.iter_mut().find(|p| p.id == id)?;
        plant.image_url = image_url.into();
        Some(&*plant)
    }

    /// Merge a full `GET /api/plants` response fetched with sequence number `seq`.
    ///
    /// Elements are correlated to plants by position. The first element's
    /// temperature and humidity become the ambient reading. Snapshots that
    /// are not newer than the last applied one are dropped untouched.
    pub fn apply_snapshot(&mut self, seq: u64, readings: &[RawPlantReading]) -> SnapshotOutcome {
        // ---
        if seq <= self.applied_seq {
            return SnapshotOutcome::Stale {
                latest: self.applied_seq,
            };
        }

        let now = Utc::now();
        let mut merged = 0;
        for (index, reading) in readings.iter().enumerate() {
            if self.merge_at_time(index, reading, now) {
                merged += 1;
            }
        }

        if let Some(first) = readings.first() {
            self.set_ambient(first.temperature, first.humidity);
        }

        self.applied_seq = seq;
        self.last_sync = Some(self.last_sync.map_or(now, |prev| prev.max(now)));
        SnapshotOutcome::Applied { merged }
    }
}

fn placeholder_image(fill: &str, n: u32) -> String {
    format!(
        "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"300\" height=\"200\">\
         <rect fill=\"{fill}\" width=\"300\" height=\"200\"/>\
         <text x=\"50%\" y=\"50%\" fill=\"white\" font-size=\"20\" text-anchor=\"middle\" dy=\".3em\">Plant {n}</text></svg>"
    )
}
