//! Collaborator configuration.
//!
//! The environment (optionally seeded from a `.env` file) is read exactly once,
//! by the binary at startup. Storage and tracking clients receive these
//! structs in their constructors; the statistical code never sees them.

use std::path::PathBuf;

use tracing::debug;

pub const ENV_STORAGE_URL: &str = "DW_STORAGE_URL";
pub const ENV_STORAGE_TOKEN: &str = "DW_STORAGE_TOKEN";
pub const ENV_TRACKING_URI: &str = "DW_TRACKING_URI";
pub const ENV_EXPERIMENT_NAME: &str = "DW_EXPERIMENT_NAME";

const DEFAULT_TRACKING_URI: &str = "mlruns";
const DEFAULT_EXPERIMENT: &str = "default";

/// Remote object storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base URL of the object store (`https://account.example.net`).
    pub endpoint: Option<String>,
    /// Optional bearer token sent with every request.
    pub token: Option<String>,
}

/// Experiment tracking settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingConfig {
    /// Tracking URI; a plain path selects the file-backed run store.
    pub uri: String,
    pub experiment: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_TRACKING_URI.to_string(),
            experiment: DEFAULT_EXPERIMENT.to_string(),
        }
    }
}

impl TrackingConfig {
    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.uri)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub tracking: TrackingConfig,
}

impl AppConfig {
    /// Load from the process environment (and `.env`, if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok());
        debug!(
            storage_configured = config.storage.endpoint.is_some(),
            tracking_uri = %config.tracking.uri,
            "loaded configuration"
        );
        config
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = TrackingConfig::default();
        Self {
            storage: StorageConfig {
                endpoint: get(ENV_STORAGE_URL).map(|u| u.trim_end_matches('/').to_string()),
                token: get(ENV_STORAGE_TOKEN),
            },
            tracking: TrackingConfig {
                uri: get(ENV_TRACKING_URI).unwrap_or(defaults.uri),
                experiment: get(ENV_EXPERIMENT_NAME).unwrap_or(defaults.experiment),
            },
        }
    }
}
