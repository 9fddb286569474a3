//! Configuration management for the ATEMS client

use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection
    pub api: ApiConfig,

    /// Dashboard polling
    pub dashboard: DashboardConfig,

    /// Query cache policy
    pub query: QueryConfig,

    /// Scan-entry behaviour
    pub scanner: ScannerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin of the ATEMS backend; empty means same origin (browser)
    pub base_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between statistics refreshes
    pub poll_interval_secs: u64,

    /// Events shown in the recent activity panel
    pub history_limit: u32,
}

/// Query cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Extra attempts after a failed fetch
    pub retry: u32,

    /// Seconds a fetched value is served without refetching
    pub stale_time_secs: u64,
}

/// Scan-entry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Delay between a badge scan and the auto-submit check, giving the
    /// username lookup time to land
    pub auto_submit_delay_ms: u64,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,

    /// Log format
    pub format: LogFormat,
}

/// Upper bound of `GET /api/history?limit=`
pub const MAX_HISTORY_LIMIT: u32 = 100;

// Default value functions
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_poll_interval() -> u64 {
    30
}

const fn default_history_limit() -> u32 {
    10
}

const fn default_retry() -> u32 {
    1
}

const fn default_stale_time() -> u64 {
    10
}

const fn default_auto_submit_delay() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            history_limit: default_history_limit(),
        }
    }
}

impl DashboardConfig {
    /// Poll interval as a [`Duration`]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// History limit clamped to what the backend accepts
    pub fn clamped_history_limit(&self) -> u32 {
        clamp_history_limit(self.history_limit)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry: default_retry(),
            stale_time_secs: default_stale_time(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            auto_submit_delay_ms: default_auto_submit_delay(),
        }
    }
}

impl ScannerConfig {
    /// Auto-submit delay as a [`Duration`]
    pub const fn auto_submit_delay(&self) -> Duration {
        Duration::from_millis(self.auto_submit_delay_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Clamp a history limit to `1..=100`
pub fn clamp_history_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_HISTORY_LIMIT)
}

impl Config {
    /// Load configuration from an optional `atems` file in the working
    /// directory and `ATEMS_*` environment variables
    /// (`ATEMS_API__BASE_URL`, `ATEMS_SCANNER__AUTO_SUBMIT_DELAY_MS`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::build(config::File::with_name("atems").required(false))
    }

    /// Load configuration from an explicit file, then environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or the result is invalid.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> crate::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("ATEMS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the client misbehave
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> crate::Result<()> {
        let base_url = self.api.base_url.trim();
        if !base_url.is_empty()
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            return Err(crate::Error::Configuration {
                message: format!("api.base_url must start with http:// or https://: {base_url}"),
            });
        }
        if self.dashboard.poll_interval_secs == 0 {
            return Err(crate::Error::Configuration {
                message: "dashboard.poll_interval_secs must be greater than zero".to_string(),
            });
        }
        if self.api.request_timeout_secs == 0 {
            return Err(crate::Error::Configuration {
                message: "api.request_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
