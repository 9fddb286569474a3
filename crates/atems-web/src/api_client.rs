//! HTTP client for communicating with the ATEMS backend from the browser
//!
//! Requests go to the page origin by default so the Flask session cookie is
//! sent along. A 401 sends the browser to the login page.

use atems_core::{
    CheckInOutRequest, CheckInOutResponse, Error, HistoryPage, Result, Stats, UserLookup, auth,
    config::clamp_history_limit,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

/// API client for making HTTP requests to the ATEMS backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client; an empty `base_url` means the page origin
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = Request::get(&self.url(path))
            .query(query.iter().copied())
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {path} failed: {e}")))?;

        check_session(&response)?;
        if !response.ok() {
            return Err(Error::Http {
                status: response.status(),
                message: response.status_text(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse response from {path}: {e}")))
    }

    /// Inventory summary
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_stats(&self) -> Result<Stats> {
        self.get_json("/api/stats", &[]).await
    }

    /// Latest check-in/out events
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn get_history(&self, limit: u32) -> Result<HistoryPage> {
        let limit = clamp_history_limit(limit).to_string();
        self.get_json("/api/history", &[("limit", limit.as_str())])
            .await
    }

    /// Username registered for `badge_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    pub async fn lookup_user(&self, badge_id: &str) -> Result<Option<String>> {
        let lookup: UserLookup = self
            .get_json("/api/user-by-badge", &[("badge_id", badge_id)])
            .await?;
        Ok(lookup.into_username())
    }

    /// Submit one check-in/out as a form post. A rejected submission, 400
    /// included, comes back as `Ok` with a non-success status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the session is missing, or the
    /// answer is not a check-in/out result.
    pub async fn check_in_out(&self, request: &CheckInOutRequest) -> Result<CheckInOutResponse> {
        let path = "/checkinout";
        let response = Request::post(&self.url(path))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(form_body(request)?)
            .map_err(|e| Error::Transport(format!("Failed to build request: {e}")))?
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {path} failed: {e}")))?;

        check_session(&response)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response from {path}: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            if (200..300).contains(&status) {
                Error::Transport(format!("Failed to parse response from {path}: {e}"))
            } else {
                Error::Http {
                    status,
                    message: format!("Unexpected response from {path}"),
                }
            }
        })
    }
}

/// URL-encoded body of a check-in/out request
///
/// # Errors
///
/// Returns an error if the request cannot be encoded.
pub fn form_body(request: &CheckInOutRequest) -> Result<String> {
    serde_urlencoded::to_string(request)
        .map_err(|e| Error::Other(format!("Failed to encode form: {e}")))
}

fn check_session(response: &Response) -> Result<()> {
    if response.status() == auth::UNAUTHORIZED_STATUS {
        return Err(auth::unauthorized(&current_path()));
    }
    Ok(())
}

/// Path of the page the browser is on
pub fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| atems_core::nav::APP_BASE_PATH.to_string())
}

/// Send the browser to `login_url`
pub fn redirect_to_login(login_url: &str) {
    leptos::logging::warn!("Session missing, redirecting to {login_url}");
    if let Some(window) = web_sys::window()
        && window.location().set_href(login_url).is_err()
    {
        leptos::logging::error!("Failed to redirect to {login_url}");
    }
}
