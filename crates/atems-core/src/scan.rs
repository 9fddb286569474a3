//! Scan-entry state machine for the check-in/out form
//!
//! A worker scans a tool, then a badge. Each scan lands in a different field
//! depending on which fields are already filled:
//!
//! | tool  | badge | scan goes to                                   |
//! |-------|-------|------------------------------------------------|
//! | empty | any   | tool                                           |
//! | set   | empty | badge, then username lookup and auto-submit    |
//! | set   | set   | tool; badge and username cleared (new session) |
//!
//! The session holds no I/O. Callers perform the lookup and timer that a
//! [`ScanOutcome::BadgeCaptured`] asks for.

use crate::{
    checkinout,
    error::Result,
    types::{CheckInOutRequest, Condition},
};

/// Placeholder while no tool has been scanned
pub const PROMPT_SCAN_TOOL: &str = "Scan or type a tool ID";

/// Placeholder once the tool is in and the badge is missing
pub const PROMPT_SCAN_BADGE: &str = "Now scan your badge";

/// Placeholder when both are in and the next scan starts over
pub const PROMPT_READY: &str = "Submit, or scan another tool to start over";

/// Which required scan fields are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// No tool yet
    Empty,
    /// Tool set, badge missing
    ToolOnly,
    /// Tool and badge set
    Complete,
}

impl ScanState {
    /// Scan-input placeholder for this state
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Empty => PROMPT_SCAN_TOOL,
            Self::ToolOnly => PROMPT_SCAN_BADGE,
            Self::Complete => PROMPT_READY,
        }
    }
}

/// What a scan did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Blank value, nothing changed
    Ignored,
    /// Value stored as the tool ID
    ToolCaptured {
        /// Tool ID now in the form
        tool_id: String,
    },
    /// Value stored as the badge ID. The caller looks up the username for
    /// this badge and arms the auto-submit timer.
    BadgeCaptured {
        /// Badge ID now in the form
        badge_id: String,
    },
    /// Both fields were set; the value replaced the tool ID and badge and
    /// username were cleared
    Restarted {
        /// Tool ID of the new session
        tool_id: String,
    },
}

impl ScanOutcome {
    /// Badge the caller has to look up, if any
    pub fn badge_to_lookup(&self) -> Option<&str> {
        match self {
            Self::BadgeCaptured { badge_id } => Some(badge_id),
            _ => None,
        }
    }
}

/// Fields of one check-in/out form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    tool_id: String,
    badge_id: String,
    username: String,
    job_id: String,
    condition: Option<Condition>,
}

impl ScanSession {
    /// Empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state, keyed by the tool and badge fields
    pub fn state(&self) -> ScanState {
        match (self.tool_id.is_empty(), self.badge_id.is_empty()) {
            (true, _) => ScanState::Empty,
            (false, true) => ScanState::ToolOnly,
            (false, false) => ScanState::Complete,
        }
    }

    /// Placeholder for the scan input
    pub fn prompt(&self) -> &'static str {
        self.state().prompt()
    }

    /// Feed one scanned or typed value into the session
    pub fn accept_scan(&mut self, raw: &str) -> ScanOutcome {
        let value = raw.trim();
        if value.is_empty() {
            return ScanOutcome::Ignored;
        }

        match self.state() {
            ScanState::Empty => {
                self.tool_id = value.to_string();
                ScanOutcome::ToolCaptured {
                    tool_id: self.tool_id.clone(),
                }
            }
            ScanState::ToolOnly => {
                self.badge_id = value.to_string();
                ScanOutcome::BadgeCaptured {
                    badge_id: self.badge_id.clone(),
                }
            }
            ScanState::Complete => {
                self.tool_id = value.to_string();
                self.badge_id.clear();
                self.username.clear();
                ScanOutcome::Restarted {
                    tool_id: self.tool_id.clone(),
                }
            }
        }
    }

    /// Store the username returned by the badge lookup. A missing or blank
    /// name leaves the field as it is.
    pub fn apply_lookup(&mut self, username: Option<String>) {
        if let Some(name) = username {
            let name = name.trim();
            if !name.is_empty() {
                self.username = name.to_string();
            }
        }
    }

    /// Store the lookup answer for `badge_id` only while that badge is still
    /// in the form. Returns whether the answer was applied; an answer for a
    /// submitted or replaced badge is dropped.
    pub fn apply_lookup_for(&mut self, badge_id: &str, username: Option<String>) -> bool {
        if self.badge_id != badge_id {
            return false;
        }
        self.apply_lookup(username);
        true
    }

    /// True when the auto-submit timer should submit the form
    pub fn ready_to_auto_submit(&self) -> bool {
        !self.username.trim().is_empty()
    }

    /// Validate and build the request body
    ///
    /// # Errors
    ///
    /// Returns a validation error when username, badge or tool is blank.
    pub fn to_request(&self) -> Result<CheckInOutRequest> {
        checkinout::build_request(
            &self.username,
            &self.badge_id,
            &self.tool_id,
            &self.job_id,
            self.condition,
        )
    }

    /// Clear tool, badge and username after a successful submission.
    /// Job ID and condition stay for the next tool.
    pub fn clear_identity(&mut self) {
        self.tool_id.clear();
        self.badge_id.clear();
        self.username.clear();
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Tool ID field
    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    /// Badge ID field
    pub fn badge_id(&self) -> &str {
        &self.badge_id
    }

    /// Username field
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Job ID field
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Condition field
    pub const fn condition(&self) -> Option<Condition> {
        self.condition
    }

    /// Overwrite the tool ID field (manual typing)
    pub fn set_tool_id(&mut self, value: impl Into<String>) {
        self.tool_id = value.into();
    }

    /// Overwrite the badge ID field (manual typing)
    pub fn set_badge_id(&mut self, value: impl Into<String>) {
        self.badge_id = value.into();
    }

    /// Overwrite the username field (manual typing)
    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
    }

    /// Overwrite the job ID field
    pub fn set_job_id(&mut self, value: impl Into<String>) {
        self.job_id = value.into();
    }

    /// Overwrite the condition field
    pub const fn set_condition(&mut self, condition: Option<Condition>) {
        self.condition = condition;
    }
}
