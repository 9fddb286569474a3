//! Core types, scan-entry state machine and configuration for the ATEMS client

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod auth;
pub mod checkinout;
pub mod config;
pub mod error;
pub mod nav;
pub mod query;
pub mod scan;
pub mod tooltips;
pub mod types;

// Re-export commonly used types
pub use checkinout::{Notice, Tone};
pub use config::Config;
pub use error::{Error, Result};
pub use scan::{ScanOutcome, ScanSession, ScanState};
pub use types::{
    CheckAction, CheckInOutRequest, CheckInOutResponse, Condition, HealthStatus, HistoryEvent,
    HistoryPage, Stats, UserLookup,
};

/// Initialize the logging system
///
/// `RUST_LOG` overrides the configured level when set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        config::LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        config::LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
    };

    result.map_err(|e| Error::Other(format!("Failed to initialize logging: {e}")))
}
