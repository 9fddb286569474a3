//! Application state management

use crate::api_client::ApiClient;
use atems_core::{
    Config, Stats,
    query::{CachedQuery, QueryPolicy},
};
use leptos::prelude::*;

/// Application state shared through context
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    /// Application configuration
    pub config: StoredValue<Config>,
    /// API client for backend communication
    pub api: StoredValue<ApiClient>,
    /// Last dashboard statistics, kept across page changes
    pub stats: RwSignal<CachedQuery<Stats>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        let api = ApiClient::new(config.api.base_url.clone());
        let policy = QueryPolicy::from(&config.query);

        Self {
            config: StoredValue::new(config),
            api: StoredValue::new(api),
            stats: RwSignal::new(CachedQuery::new(policy)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(browser_config())
    }
}

/// Defaults for the browser: same-origin requests
pub fn browser_config() -> Config {
    let mut config = Config::default();
    config.api.base_url = String::new();
    config
}

/// Application state from context
pub fn use_app_state() -> AppState {
    use_context::<AppState>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_browser_config_uses_page_origin() {
        let config = browser_config();

        assert_eq!(config.api.base_url, "");
        assert!(config.validate().is_ok());
        assert_eq!(config.dashboard, Config::default().dashboard);
    }
}
