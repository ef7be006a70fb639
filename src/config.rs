//! Configuration management for the Sitecoord client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the coordination backend, including the `/api/v1` prefix
    pub base_url: String,
    /// Request timeout; unset means the HTTP client default (none)
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Optional path of a daily rolling log file
    pub file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FleetConfig {
    /// Default state of the auto-resolve checkbox
    pub auto_resolve: bool,
    /// Horizon used as the end of open-ended assignments
    pub open_end_horizon_days: i64,
    /// Length of a service window when no end date is given
    pub service_duration_days: i64,
    /// Default distance from today of a new service window
    pub service_lead_days: i64,
    /// Default distance from today of a new movement
    pub movement_lead_days: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub fleet: FleetConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SITECOORD_API__BASE_URL, SITECOORD_FLEET__AUTO_RESOLVE, ...
            .add_source(
                Environment::with_prefix("SITECOORD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            timeout_secs: None,
            user_agent: format!("sitecoord/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            auto_resolve: true,
            open_end_horizon_days: 3650,
            service_duration_days: 7,
            service_lead_days: 14,
            movement_lead_days: 1,
        }
    }
}
