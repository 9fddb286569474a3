//! Contextual help texts, keyed by page and `data-tooltip` value

use std::{fmt, str::FromStr};

/// Attribute that marks an element as carrying help
pub const TOOLTIP_ATTRIBUTE: &str = "data-tooltip";

/// Class of the `?` icon appended to a tagged element
pub const ICON_CLASS: &str = "tooltip-icon";

/// Class of the popup inside the icon
pub const POPUP_CLASS: &str = "tooltip-popup";

/// Class toggled on the popup while the pointer is away
pub const HIDDEN_CLASS: &str = "hidden";

/// Page a set of tooltips belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    /// Inventory dashboard
    #[default]
    Dashboard,
    /// Check-in/out form
    CheckInOut,
    /// System self-test page
    SelfTest,
}

const DASHBOARD_TIPS: &[(&str, &str)] = &[
    (
        "total-tools",
        "Total number of tools in the system across all locations and categories",
    ),
    ("in-stock", "Tools currently available for checkout"),
    ("checked-out", "Tools currently checked out to users"),
    (
        "calibration-overdue",
        "Tools that require calibration attention",
    ),
    (
        "recent-activity",
        "Latest check-in and check-out events across all tools",
    ),
];

const CHECKINOUT_TIPS: &[(&str, &str)] = &[
    (
        "username",
        "Enter your username as registered in the system",
    ),
    ("badge-id", "Scan or enter your employee badge ID"),
    (
        "tool-id",
        "Scan or enter the tool ID number (e.g., CONS-HAM-001)",
    ),
    (
        "job-id",
        "Optional: Enter the job or project ID for tracking",
    ),
    (
        "condition",
        "Optional: Report the tool condition (Good, Fair, or Damaged)",
    ),
    (
        "submit-btn",
        "Submit to check out (if tool is available) or check in (if you have it checked out)",
    ),
];

const SELFTEST_TIPS: &[(&str, &str)] = &[
    (
        "run-tests",
        "Run a comprehensive system health check including database, API, and internal modules",
    ),
    (
        "test-status",
        "Current system health status based on the most recent test run",
    ),
    (
        "test-results",
        "Detailed results from each test module with pass/fail status",
    ),
];

impl Page {
    /// Page name as used in URLs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::CheckInOut => "checkinout",
            Self::SelfTest => "selftest",
        }
    }

    /// Guess the page from a URL path by substring, falling back to the
    /// dashboard. Prefer passing the page explicitly; this exists for
    /// callers that only know the location.
    pub fn from_path(path: &str) -> Self {
        if path.contains(Self::CheckInOut.as_str()) {
            Self::CheckInOut
        } else if path.contains(Self::SelfTest.as_str()) {
            Self::SelfTest
        } else {
            Self::Dashboard
        }
    }

    /// Every `(key, text)` pair known for this page
    pub const fn entries(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Dashboard => DASHBOARD_TIPS,
            Self::CheckInOut => CHECKINOUT_TIPS,
            Self::SelfTest => SELFTEST_TIPS,
        }
    }

    /// Help text for `key` on this page
    pub fn lookup(self, key: &str) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, text)| *text)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Dashboard, Self::CheckInOut, Self::SelfTest]
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| crate::Error::Other(format!("Unknown tooltip page: {s}")))
    }
}

/// CSS selector matching elements tagged with `key`
pub fn selector(key: &str) -> String {
    format!("[{TOOLTIP_ATTRIBUTE}=\"{key}\"]")
}
