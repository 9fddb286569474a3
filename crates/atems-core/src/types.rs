//! Wire types shared by the browser and station clients

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Status value the backend uses for a successful check-in/out
pub const STATUS_SUCCESS: &str = "success";

/// Inventory summary served by `GET /api/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Every tool known to the system
    pub total_tools: u64,
    /// Tools currently checked out to a user
    pub checked_out: u64,
    /// Tools available for checkout
    pub in_stock: u64,
    /// Tools that carry a calibration due date
    pub calibrated_tools: u64,
    /// Tools whose calibration due date has passed
    pub calibration_overdue: u64,
}

/// Answer of `GET /api/user-by-badge`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLookup {
    /// Username registered for the badge, `null` when unknown
    #[serde(default)]
    pub username: Option<String>,
}

impl UserLookup {
    /// Username with blank values treated as missing
    pub fn into_username(self) -> Option<String> {
        self.username
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }
}

/// Tool condition reported at check-in/out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// No visible wear
    Good,
    /// Usable with wear
    Fair,
    /// Needs repair
    Damaged,
}

impl Condition {
    /// All conditions in form order
    pub const ALL: [Self; 3] = [Self::Good, Self::Fair, Self::Damaged];

    /// Form value sent to the backend
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Damaged => "Damaged",
        }
    }

    /// Parse an optional form value; blank means "not reported"
    ///
    /// # Errors
    ///
    /// Returns a validation error for values other than Good, Fair or Damaged.
    pub fn parse_optional(value: &str) -> crate::Result<Option<Self>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value.parse().map(Some)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                crate::Error::validation("condition", format!("Not a valid choice: {s}"))
            })
    }
}

/// Form body of `POST /checkinout`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInOutRequest {
    /// Username of the worker
    pub username: String,
    /// Badge ID scanned from the worker's badge
    pub badge_id: String,
    /// Tool ID, e.g. `CONS-HAM-001`
    pub tool_id_number: String,
    /// Job or project the tool is used for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Reported tool condition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

/// Which way a tool moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckAction {
    /// Tool returned to the crib
    Checkin,
    /// Tool lent to a worker
    Checkout,
}

impl CheckAction {
    /// Lowercase name used in the history feed
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkin => "checkin",
            Self::Checkout => "checkout",
        }
    }
}

/// Response of `POST /checkinout`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInOutResponse {
    /// `"success"` or an error status
    pub status: String,
    /// Display text
    #[serde(default)]
    pub message: Option<String>,
    /// Appended to the message when the tool is overdue for calibration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_warning: Option<String>,
    /// Direction of the move, sent by the JSON endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<CheckAction>,
    /// Per-field validation messages sent with a 400
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl CheckInOutResponse {
    /// Successful response carrying `message`
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Error response carrying `message`
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Attach a calibration warning
    #[must_use]
    pub fn with_calibration_warning(mut self, warning: impl Into<String>) -> Self {
        self.calibration_warning = Some(warning.into());
        self
    }

    /// True when the backend accepted the check-in/out
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Calibration warning, ignoring blank values
    pub fn calibration_warning(&self) -> Option<&str> {
        self.calibration_warning
            .as_deref()
            .filter(|warning| !warning.trim().is_empty())
    }
}

/// One row of the check-in/out audit trail (`GET /api/history`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// When the event happened (server local time)
    #[serde(default)]
    pub event_time: Option<NaiveDateTime>,
    /// `checkin` or `checkout`
    pub action: String,
    /// Tool ID
    pub tool_id_number: String,
    /// Human readable tool name
    #[serde(default)]
    pub tool_name: Option<String>,
    /// Worker who moved the tool
    pub username: String,
    /// Job or project ID, if given
    #[serde(default)]
    pub job_id: Option<String>,
    /// Reported condition, if given
    #[serde(default)]
    pub condition: Option<String>,
}

impl HistoryEvent {
    /// Tool name, falling back to the tool ID
    pub fn tool_label(&self) -> &str {
        self.tool_name.as_deref().unwrap_or(&self.tool_id_number)
    }

    /// Event time formatted for display, empty when unknown
    pub fn time_label(&self) -> String {
        self.event_time
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Envelope of `GET /api/history`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Newest first
    #[serde(default)]
    pub events: Vec<HistoryEvent>,
}

/// Answer of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `healthy` when the backend is up
    pub status: String,
    /// Service name
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    /// True when the backend reports itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stats_from_api_json() {
        let stats: Stats = serde_json::from_str(
            r#"{"total_tools": 120, "checked_out": 20, "in_stock": 100,
                "calibrated_tools": 40, "calibration_overdue": 3}"#,
        )
        .unwrap();

        assert_eq!(
            stats,
            Stats {
                total_tools: 120,
                checked_out: 20,
                in_stock: 100,
                calibrated_tools: 40,
                calibration_overdue: 3,
            }
        );
    }

    #[test]
    fn test_stats_reject_negative_counts() {
        let result = serde_json::from_str::<Stats>(
            r#"{"total_tools": -1, "checked_out": 0, "in_stock": 0,
                "calibrated_tools": 0, "calibration_overdue": 0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_user_lookup_null_and_blank() {
        let lookup: UserLookup = serde_json::from_str(r#"{"username": null}"#).unwrap();
        assert_eq!(lookup.into_username(), None);

        let lookup: UserLookup = serde_json::from_str("{}").unwrap();
        assert_eq!(lookup.into_username(), None);

        let lookup: UserLookup = serde_json::from_str(r#"{"username": "  "}"#).unwrap();
        assert_eq!(lookup.into_username(), None);

        let lookup: UserLookup = serde_json::from_str(r#"{"username": "jdoe"}"#).unwrap();
        assert_eq!(lookup.into_username(), Some("jdoe".to_string()));
    }

    #[test]
    fn test_condition_parsing() {
        assert_eq!(Condition::parse_optional("").unwrap(), None);
        assert_eq!(Condition::parse_optional("  ").unwrap(), None);
        assert_eq!(
            Condition::parse_optional("Good").unwrap(),
            Some(Condition::Good)
        );
        assert_eq!(
            Condition::parse_optional("damaged").unwrap(),
            Some(Condition::Damaged)
        );
        assert!(Condition::parse_optional("Broken").is_err());
    }

    #[test]
    fn test_request_form_encoding_omits_missing_optionals() {
        let request = CheckInOutRequest {
            username: "jdoe".to_string(),
            badge_id: "B123".to_string(),
            tool_id_number: "CONS-HAM-001".to_string(),
            job_id: None,
            condition: None,
        };

        let body = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(
            body,
            "username=jdoe&badge_id=B123&tool_id_number=CONS-HAM-001"
        );
    }

    #[test]
    fn test_request_form_encoding_with_optionals() {
        let request = CheckInOutRequest {
            username: "jdoe".to_string(),
            badge_id: "B123".to_string(),
            tool_id_number: "CONS-HAM-001".to_string(),
            job_id: Some("JOB 7".to_string()),
            condition: Some(Condition::Fair),
        };

        let body = serde_urlencoded::to_string(&request).unwrap();
        assert!(body.ends_with("&job_id=JOB+7&condition=Fair"));
    }

    #[test]
    fn test_response_success_with_warning() {
        let response: CheckInOutResponse = serde_json::from_str(
            r#"{"status": "success", "message": "Tool Hammer checked out.",
                "calibration_warning": "This tool is overdue for calibration."}"#,
        )
        .unwrap();

        assert!(response.is_success());
        assert_eq!(
            response.calibration_warning(),
            Some("This tool is overdue for calibration.")
        );
    }

    #[test]
    fn test_response_validation_failure_body() {
        let response: CheckInOutResponse = serde_json::from_str(
            r#"{"status": "error", "message": "Badge ID must be alphanumeric.",
                "errors": {"badge_id": ["Badge ID must be alphanumeric."]}}"#,
        )
        .unwrap();

        assert!(!response.is_success());
        let errors = response.errors.unwrap();
        assert_eq!(errors["badge_id"].len(), 1);
    }

    #[test]
    fn test_response_action_field() {
        let response: CheckInOutResponse = serde_json::from_str(
            r#"{"status": "success", "message": "Tool Hammer checked in.", "action": "checkin"}"#,
        )
        .unwrap();
        assert_eq!(response.action, Some(CheckAction::Checkin));
    }

    #[test]
    fn test_blank_calibration_warning_is_ignored() {
        let response = CheckInOutResponse::success("Checked out").with_calibration_warning(" ");
        assert_eq!(response.calibration_warning(), None);
    }

    #[test]
    fn test_history_event_from_flask_isoformat() {
        let page: HistoryPage = serde_json::from_str(
            r#"{"events": [{
                "event_time": "2024-03-15T14:25:30.123456",
                "action": "checkout",
                "tool_id_number": "CONS-HAM-001",
                "tool_name": "Claw Hammer",
                "username": "jdoe",
                "job_id": null,
                "condition": "Good"
            }, {
                "event_time": null,
                "action": "checkin",
                "tool_id_number": "CONS-SAW-002",
                "tool_name": null,
                "username": "asmith",
                "job_id": "J-9",
                "condition": null
            }]}"#,
        )
        .unwrap();

        assert_eq!(page.events.len(), 2);
        assert_eq!(page.events[0].tool_label(), "Claw Hammer");
        assert_eq!(page.events[0].time_label(), "2024-03-15 14:25");
        assert_eq!(page.events[1].tool_label(), "CONS-SAW-002");
        assert_eq!(page.events[1].time_label(), "");
    }

    #[test]
    fn test_health_status() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "healthy", "service": "ATEMS"}"#).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.service.as_deref(), Some("ATEMS"));
    }
}
