//! Common test utilities for station integration tests

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use atems_core::{CheckInOutRequest, CheckInOutResponse, Error, Result};
use atems_station::StationBackend;
use std::{sync::Mutex, time::Duration};
use tokio::time::Instant;

pub mod helpers;

pub use helpers::*;

/// How the mock answers a badge lookup
#[derive(Debug, Clone)]
pub enum LookupBehaviour {
    /// Answer with this username (`None` for an unknown badge)
    User(Option<String>),
    /// Fail as if the backend were unreachable
    Fail,
    /// Answer 401
    Unauthorized,
}

/// How the mock answers a submission
#[derive(Debug, Clone)]
pub enum SubmitBehaviour {
    /// Answer with this body
    Respond(CheckInOutResponse),
    /// Fail as if the backend were unreachable
    Fail,
    /// Answer 401
    Unauthorized,
}

/// In-memory backend with a configurable lookup latency
#[derive(Debug)]
pub struct MockBackend {
    lookup_delay: Duration,
    lookup: LookupBehaviour,
    submit: SubmitBehaviour,
    lookups: Mutex<Vec<String>>,
    submissions: Mutex<Vec<(Instant, CheckInOutRequest)>>,
}

impl MockBackend {
    /// Backend that knows `username` and accepts every submission
    pub fn with_user(username: &str) -> Self {
        Self {
            lookup_delay: Duration::from_millis(10),
            lookup: LookupBehaviour::User(Some(username.to_string())),
            submit: SubmitBehaviour::Respond(CheckInOutResponse::success(
                "Tool CONS-HAM-001 checked out to jdoe.",
            )),
            lookups: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Change how long a lookup takes
    #[must_use]
    pub fn lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    /// Change the lookup answer
    #[must_use]
    pub fn lookup(mut self, behaviour: LookupBehaviour) -> Self {
        self.lookup = behaviour;
        self
    }

    /// Change the submission answer
    #[must_use]
    pub fn submit(mut self, behaviour: SubmitBehaviour) -> Self {
        self.submit = behaviour;
        self
    }

    /// Badges looked up so far
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    /// Requests submitted so far
    pub fn submissions(&self) -> Vec<CheckInOutRequest> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// When each request was submitted
    pub fn submission_times(&self) -> Vec<Instant> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|(at, _)| *at)
            .collect()
    }
}

fn unauthorized() -> Error {
    atems_core::auth::unauthorized("/app")
}

#[async_trait]
impl StationBackend for MockBackend {
    async fn lookup_user(&self, badge_id: &str) -> Result<Option<String>> {
        self.lookups.lock().unwrap().push(badge_id.to_string());
        tokio::time::sleep(self.lookup_delay).await;
        match &self.lookup {
            LookupBehaviour::User(username) => Ok(username.clone()),
            LookupBehaviour::Fail => Err(Error::Transport("connection refused".to_string())),
            LookupBehaviour::Unauthorized => Err(unauthorized()),
        }
    }

    async fn check_in_out(&self, request: &CheckInOutRequest) -> Result<CheckInOutResponse> {
        self.submissions
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));
        match &self.submit {
            SubmitBehaviour::Respond(response) => Ok(response.clone()),
            SubmitBehaviour::Fail => Err(Error::Transport("connection reset".to_string())),
            SubmitBehaviour::Unauthorized => Err(unauthorized()),
        }
    }
}
