//! Check-in/out form validation and outcome messages
//!
//! The browser page and the scan station both turn a backend answer into a
//! [`Notice`]: a line of text plus a tone that decides its styling.

use crate::{
    error::{Error, Result},
    types::{CheckInOutRequest, CheckInOutResponse, Condition},
};

/// Shown when a required field is empty
pub const MISSING_FIELDS_MESSAGE: &str = "All fields must be filled out.";

/// Shown when the backend rejects a submission without a message
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred.";

/// Shown when the request never produced a readable answer
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Styling of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Tool moved, nothing to flag
    Success,
    /// Tool moved but needs attention (calibration overdue)
    Warning,
    /// Nothing happened
    Error,
}

impl Tone {
    /// CSS class carried by the message box
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice notice-success",
            Self::Warning => "notice notice-warning",
            Self::Error => "notice notice-error",
        }
    }

    /// Short label for terminal output
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Rendered result of a check-in/out attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown to the worker
    pub text: String,
    /// Styling
    pub tone: Tone,
}

impl Notice {
    /// Error notice with `text`
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }

    /// Notice for a missing required field
    pub fn missing_fields() -> Self {
        Self::error(MISSING_FIELDS_MESSAGE)
    }

    /// Notice for a failed request
    pub fn network_error() -> Self {
        Self::error(NETWORK_ERROR_MESSAGE)
    }

    /// Map a backend answer to a notice.
    ///
    /// A success carrying a calibration warning gets the warning appended and
    /// the warning tone. A non-success shows the backend message or the
    /// generic fallback.
    pub fn from_response(response: &CheckInOutResponse) -> Self {
        let message = response.message.as_deref().unwrap_or_default();

        if !response.is_success() {
            let text = if message.is_empty() {
                GENERIC_ERROR_MESSAGE
            } else {
                message
            };
            return Self::error(text);
        }

        match response.calibration_warning() {
            Some(warning) => Self {
                text: format!("{message} {warning}"),
                tone: Tone::Warning,
            },
            None => Self {
                text: message.to_string(),
                tone: Tone::Success,
            },
        }
    }

    /// Map a client-side failure to a notice.
    ///
    /// Returns `None` for [`Error::Unauthorized`]: that one redirects to the
    /// login page and never shows inline.
    pub fn from_error(error: &Error) -> Option<Self> {
        match error {
            Error::Unauthorized { .. } => None,
            Error::Validation { message, .. } => Some(Self::error(message.clone())),
            Error::Camera(message) => Some(Self::error(format!("Camera error: {message}"))),
            _ => Some(Self::network_error()),
        }
    }
}

/// Validate the form fields and build the request body.
///
/// Username, badge ID and tool ID are required; job ID and condition are
/// optional and dropped when blank.
///
/// # Errors
///
/// Returns [`Error::Validation`] with [`MISSING_FIELDS_MESSAGE`] when a
/// required field is blank, or when `condition` is not a known choice.
pub fn build_request(
    username: &str,
    badge_id: &str,
    tool_id_number: &str,
    job_id: &str,
    condition: Option<Condition>,
) -> Result<CheckInOutRequest> {
    let required = [
        ("username", username),
        ("badge_id", badge_id),
        ("tool_id_number", tool_id_number),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(Error::validation(*field, MISSING_FIELDS_MESSAGE));
    }

    let job_id = job_id.trim();
    Ok(CheckInOutRequest {
        username: username.trim().to_string(),
        badge_id: badge_id.trim().to_string(),
        tool_id_number: tool_id_number.trim().to_string(),
        job_id: (!job_id.is_empty()).then(|| job_id.to_string()),
        condition,
    })
}
