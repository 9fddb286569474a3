//! ATEMS web interface
//!
//! Client-side rendered dashboard and check-in/out form, served by the
//! backend under `/app` and talking to its JSON API with the session cookie.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::must_use_candidate, clippy::module_name_repetitions)]

pub mod api_client;
pub mod app;
pub mod camera;
pub mod components;
pub mod pages;
pub mod state;
pub mod tooltips;

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

// Re-export the main component
pub use app::App;
pub use state::AppState;
