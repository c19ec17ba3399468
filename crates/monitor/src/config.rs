use std::path::PathBuf;
use std::time::Duration;

use rulwatch_core::machine::{fallback_machines, validate_fleet, MachineRecord};
use rulwatch_core::CoreError;

pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:8000/predict_batch";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while loading startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("Failed to read machines file {path}: {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse machines file {path}: {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid machines file {path}: {source}")]
    SeedInvalid {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}

/// Monitor configuration loaded from environment variables.
///
/// Every field has a default matching the stock prediction service on
/// localhost, so a bare `rulwatch-monitor` works out of the box.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Full URL of the batch prediction endpoint.
    pub predict_url: String,
    /// Time between poll cycles.
    pub poll_interval: Duration,
    /// Transport-level timeout applied to each request.
    pub request_timeout: Duration,
    /// Optional JSON file with the seed fleet. Falls back to the built-in fleet.
    pub machines_file: Option<PathBuf>,
}

impl MonitorConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `PREDICT_URL`          | `http://127.0.0.1:8000/predict_batch` |
    /// | `POLL_INTERVAL_MS`     | `5000`                                |
    /// | `REQUEST_TIMEOUT_SECS` | `10`                                  |
    /// | `MACHINES_FILE`        | unset (built-in fleet)                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let predict_url = lookup("PREDICT_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICT_URL.to_string());

        let poll_interval_ms =
            parse_positive(&lookup, "POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?;
        let request_timeout_secs =
            parse_positive(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

        let machines_file = lookup("MACHINES_FILE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            predict_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            machines_file,
        })
    }

    /// The seed fleet: the configured machines file, or the built-in fleet.
    pub fn load_machines(&self) -> Result<Vec<MachineRecord>, ConfigError> {
        let Some(path) = &self.machines_file else {
            return Ok(fallback_machines());
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead {
            path: path.clone(),
            source,
        })?;
        let machines: Vec<MachineRecord> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::SeedParse {
                path: path.clone(),
                source,
            })?;
        validate_fleet(&machines).map_err(|source| ConfigError::SeedInvalid {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), machine_count = machines.len(), "Loaded machines file");
        Ok(machines)
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid { var, value }),
        },
    }
}
