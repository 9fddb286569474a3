//! HTTP client for the ATEMS backend

use atems_core::{
    CheckInOutRequest, CheckInOutResponse, Error, HealthStatus, HistoryPage, Result, Stats,
    UserLookup, auth,
    config::{ApiConfig, clamp_history_limit},
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::LOCATION, redirect::Policy};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

/// Message the login page flashes for bad credentials
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password.";

/// API client holding one backend session
///
/// Redirects are not followed: a redirect to the login page is how the
/// backend reports a missing session on server pages, and a redirect away
/// from `/login` is how it reports a successful login.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Backend origin requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send `request`, mapping transport failures and a missing session.
    /// `path` is the backend path used as the login return target.
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {path} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || redirects_to_login(&response) {
            warn!(path, %status, "backend session missing");
            return Err(auth::unauthorized(path));
        }

        debug!(path, %status, "backend answered");
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let request = self.client.get(self.url(path)).query(query);
        let response = self.send(request, path).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Failed to parse response from {path}: {e}")))
    }

    /// Backend health (`GET /api/health`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get_json("/api/health", &[]).await
    }

    /// Log in with the server-rendered login form and keep the session cookie
    ///
    /// # Errors
    ///
    /// Returns a validation error for rejected credentials, or a transport
    /// error if the backend cannot be reached.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url(auth::LOGIN_PATH))
            .form(&[("username", username), ("password", password)]);
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Login request failed: {e}")))?;

        let status = response.status();
        if status.is_redirection() && !redirects_to_login(&response) {
            debug!(username, "logged in");
            return Ok(());
        }
        if status.is_success() || status.is_redirection() {
            // Login page rendered again with a flash message
            return Err(Error::validation("password", INVALID_LOGIN_MESSAGE));
        }

        Err(Error::Http {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }

    /// Inventory summary (`GET /api/stats`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<Stats> {
        self.get_json("/api/stats", &[]).await
    }

    /// Latest check-in/out events (`GET /api/history`). `limit` is clamped
    /// to what the backend accepts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn get_history(&self, limit: u32) -> Result<HistoryPage> {
        let limit = clamp_history_limit(limit).to_string();
        self.get_json("/api/history", &[("limit", limit.as_str())])
            .await
    }

    /// Username registered for `badge_id` (`GET /api/user-by-badge`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn lookup_user(&self, badge_id: &str) -> Result<Option<String>> {
        let lookup: UserLookup = self
            .get_json("/api/user-by-badge", &[("badge_id", badge_id)])
            .await?;
        Ok(lookup.into_username())
    }

    /// Submit one check-in/out (`POST /checkinout`, form-encoded).
    ///
    /// A rejected submission is `Ok` with a non-success status; the backend
    /// answers validation failures with a 400 carrying the same JSON shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the session is missing, or
    /// the backend answers without a readable result.
    #[instrument(skip(self, request), fields(tool = %request.tool_id_number))]
    pub async fn check_in_out(&self, request: &CheckInOutRequest) -> Result<CheckInOutResponse> {
        let path = "/checkinout";
        let builder = self
            .client
            .post(self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(request);
        let response = self.send(builder, path).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response from {path}: {e}")))?;

        match serde_json::from_str::<CheckInOutResponse>(&body) {
            Ok(result) => {
                debug!(status = %result.status, "check-in/out answered");
                Ok(result)
            }
            Err(_) if !status.is_success() => Err(Error::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or_default().to_string(),
            }),
            Err(e) => Err(Error::Transport(format!(
                "Failed to parse response from {path}: {e}"
            ))),
        }
    }
}

fn redirects_to_login(response: &Response) -> bool {
    response.status().is_redirection()
        && response
            .headers()
            .get(LOCATION)
            .and_then(|location| location.to_str().ok())
            .is_some_and(|location| location.contains(auth::LOGIN_PATH))
}
