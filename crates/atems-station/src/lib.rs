//! Scan station and command-line client for ATEMS tool check-in/out
//!
//! The station reads scanner input (a keyboard-wedge scanner types the code
//! followed by Enter), fills the check-in/out form through the shared
//! [`atems_core::ScanSession`] and submits it to the backend.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod command;
pub mod station;

// Re-export commonly used types
pub use api_client::ApiClient;
pub use command::StationCommand;
pub use station::{ScanReport, ScanStation, StationBackend};
