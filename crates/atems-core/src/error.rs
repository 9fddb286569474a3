//! Error types for the ATEMS client

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ATEMS client
#[derive(Error, Debug)]
pub enum Error {
    /// A required form field is missing or malformed
    #[error("Validation error: {field} - {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The backend answered 401; the user has to log in first
    #[error("Authentication required, log in at {login_url}")]
    Unauthorized {
        /// Login page URL carrying the return target
        login_url: String,
    },

    /// Non-success HTTP status without a usable body
    #[error("API returned error: {status} {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Status text or body excerpt
        message: String,
    },

    /// Network failure, timeout or unreadable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Camera scanner could not be started or stopped
    #[error("Camera error: {0}")]
    Camera(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a validation error for `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True when the caller should redirect to the login page instead of
    /// showing an inline error.
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Login URL for an [`Error::Unauthorized`]
    pub fn login_url(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { login_url } => Some(login_url),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as StdError;

    #[test]
    fn test_validation_error_display() {
        let error = Error::validation("username", "Field is required");

        assert_eq!(
            error.to_string(),
            "Validation error: username - Field is required"
        );
    }

    #[test]
    fn test_unauthorized_carries_login_url() {
        let error = Error::Unauthorized {
            login_url: "/login?next=%2Fapp".to_string(),
        };

        assert!(error.is_unauthorized());
        assert_eq!(error.login_url(), Some("/login?next=%2Fapp"));
        assert!(error.to_string().contains("/login?next=%2Fapp"));
    }

    #[test]
    fn test_non_auth_errors_have_no_login_url() {
        let errors = vec![
            Error::Transport("connection refused".to_string()),
            Error::Http {
                status: 500,
                message: "Internal Server Error".to_string(),
            },
            Error::Camera("NotAllowedError".to_string()),
            Error::Other("boom".to_string()),
        ];

        for error in errors {
            assert!(!error.is_unauthorized());
            assert!(error.login_url().is_none());
        }
    }

    #[test]
    fn test_http_error_display() {
        let error = Error::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(error.to_string(), "API returned error: 502 Bad Gateway");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = Error::from(json_error);

        match &error {
            Error::Serialization(_) => {}
            other => panic!("Expected Serialization error variant, got {other:?}"),
        }
        assert!(error.source().is_some());
    }

    #[test]
    fn test_config_error_conversion() {
        let config_error = config::ConfigError::Message("missing api.base_url".to_string());
        let error = Error::from(config_error);

        assert_eq!(
            error.to_string(),
            "Configuration error: missing api.base_url"
        );
    }
}
