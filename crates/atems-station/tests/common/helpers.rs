//! Test helper functions

use atems_core::config::ApiConfig;
use atems_station::ApiClient;
use std::sync::Once;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// API client pointed at a mock server
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.uri(),
        request_timeout_secs: 5,
    })
    .unwrap()
}

/// JSON body of a successful check-in/out
pub fn success_body(message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "message": message,
        "action": "checkout",
    })
}
