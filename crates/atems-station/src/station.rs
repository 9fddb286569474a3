//! Scan station: drives a [`ScanSession`] from scanner input
//!
//! The station owns one session and handles one scan at a time. A badge scan
//! races the username lookup against the auto-submit timer inside the same
//! task, so a second scan can never land while the timer is pending.

use crate::api_client::ApiClient;
use async_trait::async_trait;
use atems_core::{
    CheckInOutRequest, CheckInOutResponse, Notice, Result, ScanOutcome, ScanSession,
    config::ScannerConfig,
};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Backend calls the station needs
#[async_trait]
pub trait StationBackend: Send + Sync {
    /// Username registered for `badge_id`
    async fn lookup_user(&self, badge_id: &str) -> Result<Option<String>>;

    /// Submit one check-in/out
    async fn check_in_out(&self, request: &CheckInOutRequest) -> Result<CheckInOutResponse>;
}

#[async_trait]
impl StationBackend for ApiClient {
    async fn lookup_user(&self, badge_id: &str) -> Result<Option<String>> {
        Self::lookup_user(self, badge_id).await
    }

    async fn check_in_out(&self, request: &CheckInOutRequest) -> Result<CheckInOutResponse> {
        Self::check_in_out(self, request).await
    }
}

/// What one scan did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Where the value went
    pub outcome: ScanOutcome,
    /// Username returned by the badge lookup
    pub username: Option<String>,
    /// Result of the auto-submit, when it fired
    pub submission: Option<Notice>,
}

impl ScanReport {
    const fn new(outcome: ScanOutcome) -> Self {
        Self {
            outcome,
            username: None,
            submission: None,
        }
    }
}

/// One check-in/out terminal
#[derive(Debug)]
pub struct ScanStation<B> {
    backend: B,
    session: ScanSession,
    auto_submit_delay: Duration,
}

impl<B: StationBackend> ScanStation<B> {
    /// Create a station with an empty session
    pub fn new(backend: B, config: &ScannerConfig) -> Self {
        Self::with_delay(backend, config.auto_submit_delay())
    }

    /// Create a station with an explicit auto-submit delay
    pub fn with_delay(backend: B, auto_submit_delay: Duration) -> Self {
        Self {
            backend,
            session: ScanSession::new(),
            auto_submit_delay,
        }
    }

    /// Current form fields
    pub const fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Form fields for manual edits (username, job ID, condition)
    pub const fn session_mut(&mut self) -> &mut ScanSession {
        &mut self.session
    }

    /// Backend the station talks to
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Feed one scanned value.
    ///
    /// A badge scan starts the username lookup and the auto-submit timer
    /// together. When the timer fires the form is submitted if the username
    /// is filled by then; a lookup that lands later still fills the username
    /// but submits nothing. A late answer is dropped once its badge has been
    /// submitted and cleared.
    ///
    /// # Errors
    ///
    /// Returns [`atems_core::Error::Unauthorized`] when the backend session
    /// is missing and nothing was submitted. Other lookup failures are logged
    /// and leave the username empty.
    pub async fn handle_scan(&mut self, raw: &str) -> Result<ScanReport> {
        let outcome = self.session.accept_scan(raw);
        debug!(?outcome, state = ?self.session.state(), "scan accepted");

        let Some(badge_id) = outcome.badge_to_lookup().map(str::to_owned) else {
            return Ok(ScanReport::new(outcome));
        };
        let mut report = ScanReport::new(outcome);

        let lookup = self.backend.lookup_user(&badge_id);
        let timer = tokio::time::sleep(self.auto_submit_delay);
        tokio::pin!(lookup);
        tokio::pin!(timer);

        let early = tokio::select! {
            biased;
            result = &mut lookup => Some(result),
            () = &mut timer => None,
        };

        match early {
            Some(result) => {
                report.username = apply_lookup(&mut self.session, &badge_id, result)?;
                timer.await;
                if self.session.ready_to_auto_submit() {
                    let notice = submit_session(&self.backend, &mut self.session).await?;
                    report.submission = Some(notice);
                }
            }
            None => {
                if self.session.ready_to_auto_submit() {
                    let notice = submit_session(&self.backend, &mut self.session).await?;
                    report.submission = Some(notice);
                } else {
                    debug!(badge_id, "auto-submit skipped, username still empty");
                }
                match apply_lookup(&mut self.session, &badge_id, lookup.await) {
                    Ok(username) => report.username = username,
                    // The tool is already recorded; the next request reports
                    // the missing session
                    Err(error) if report.submission.is_some() => {
                        warn!(badge_id, %error, "username lookup failed after submission");
                    }
                    Err(error) => return Err(error),
                }
            }
        }

        Ok(report)
    }

    /// Validate and submit the current form.
    ///
    /// Validation failures, rejected submissions and transport failures all
    /// come back as a [`Notice`]. On success tool, badge and username are
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`atems_core::Error::Unauthorized`] when the backend session
    /// is missing.
    pub async fn submit(&mut self) -> Result<Notice> {
        submit_session(&self.backend, &mut self.session).await
    }

    /// Clear every field
    pub fn reset(&mut self) {
        self.session.reset();
    }
}

fn apply_lookup(
    session: &mut ScanSession,
    badge_id: &str,
    result: Result<Option<String>>,
) -> Result<Option<String>> {
    match result {
        Ok(username) => {
            if username.is_none() {
                info!(badge_id, "no user registered for badge");
            }
            if !session.apply_lookup_for(badge_id, username.clone()) {
                debug!(badge_id, "lookup answered for a badge no longer in the form");
            }
            Ok(username)
        }
        Err(error) if error.is_unauthorized() => Err(error),
        Err(error) => {
            warn!(badge_id, %error, "username lookup failed");
            Ok(None)
        }
    }
}

async fn submit_session<B: StationBackend>(
    backend: &B,
    session: &mut ScanSession,
) -> Result<Notice> {
    let request = match session.to_request() {
        Ok(request) => request,
        Err(error) => {
            debug!(%error, "submission rejected before sending");
            return Ok(Notice::from_error(&error).unwrap_or_else(Notice::missing_fields));
        }
    };

    match backend.check_in_out(&request).await {
        Ok(response) => {
            if response.is_success() {
                info!(
                    tool = %request.tool_id_number,
                    username = %request.username,
                    action = ?response.action,
                    "check-in/out recorded"
                );
                session.clear_identity();
            } else {
                warn!(
                    tool = %request.tool_id_number,
                    message = ?response.message,
                    "check-in/out rejected"
                );
            }
            Ok(Notice::from_response(&response))
        }
        Err(error) if error.is_unauthorized() => Err(error),
        Err(error) => {
            error!(%error, "check-in/out request failed");
            Ok(Notice::network_error())
        }
    }
}
