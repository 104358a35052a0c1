//! Configuration loader for the `plant-monitor` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Parse an optional numeric variable with a default value.
macro_rules! parse_var {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string variable.
macro_rules! require_var {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .filter(|v: &String| !v.is_empty())
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Base URL of the plant-monitoring device (e.g. `http://192.168.4.1`).
    pub device_url: String,

    /// Seconds between sync ticks.
    pub sync_interval_secs: u64,

    /// Per-request timeout for device calls, in seconds.
    pub device_timeout_secs: u64,

    /// Port the dashboard API listens on.
    pub listen_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DEVICE_API_URL` – device base URL
///
/// Optional:
/// - `SYNC_INTERVAL_SECS` – seconds between syncs (default: 5)
/// - `DEVICE_TIMEOUT_SECS` – device request timeout (default: 10)
/// - `LISTEN_PORT` – HTTP port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Same as [`load_from_env`] but reads variables through `lookup`.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let device_url = require_var!(lookup, "DEVICE_API_URL");
    let sync_interval_secs = parse_var!(lookup, "SYNC_INTERVAL_SECS", u64, 5);
    let device_timeout_secs = parse_var!(lookup, "DEVICE_TIMEOUT_SECS", u64, 10);
    let listen_port = parse_var!(lookup, "LISTEN_PORT", u16, 8080);

    if sync_interval_secs == 0 {
        return Err(anyhow!("SYNC_INTERVAL_SECS must be greater than zero"));
    }

    Ok(Config {
        device_url,
        sync_interval_secs,
        device_timeout_secs,
        listen_port,
    })
}

impl Config {
    // ---
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn device_timeout(&self) -> Duration {
        Duration::from_secs(self.device_timeout_secs)
    }

    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DEVICE_API_URL      : {}", self.device_url);
        tracing::info!("  SYNC_INTERVAL_SECS  : {}", self.sync_interval_secs);
        tracing::info!("  DEVICE_TIMEOUT_SECS : {}", self.device_timeout_secs);
        tracing::info!("  LISTEN_PORT         : {}", self.listen_port);
    }
}
