// --- File: crates/stayreal_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/database.db, loaded via STAYREAL__DATABASE__URL
    #[serde(default)]
    pub max_connections: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://database.db".to_string(),
            max_connections: None,
        }
    }
}

// --- Upstream (moments API) Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the "last moment" resource; the region name is appended as a path segment.
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mobile-l7.bereal.com/api/bereal/moments/last".to_string(),
            timeout_secs: None,
        }
    }
}

// --- Notifier Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotifierConfig {
    /// Region names to poll. Empty means every known region.
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

// --- Firebase Config ---
// The service account key file holds the secret; only its path is configured.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct FirebaseConfig {
    pub project_id: Option<String>,
    pub key_path: Option<String>,
    /// Overrides https://fcm.googleapis.com, used against local mocks.
    #[serde(default)]
    pub api_base_url: Option<String>,
}

// --- APNs Config ---
// The .p8 signing key is read from key_path at startup.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApnsConfig {
    pub team_id: String,
    pub key_id: String,
    pub key_path: String,
    /// The app bundle id, sent as apns-topic.
    pub topic: String,
    /// Overrides the production host, used against local mocks.
    #[serde(default)]
    pub production_url: Option<String>,
    /// Overrides the sandbox host, used against local mocks.
    #[serde(default)]
    pub sandbox_url: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_firebase: bool,
    #[serde(default)]
    pub use_apns: bool,

    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub firebase: Option<FirebaseConfig>,
    #[serde(default)]
    pub apns: Option<ApnsConfig>,
}
