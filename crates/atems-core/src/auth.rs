//! Login redirect for unauthenticated API calls

use crate::error::Error;

/// Server-rendered login page
pub const LOGIN_PATH: &str = "/login";

/// HTTP status that sends the user to the login page
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Login URL that returns to `current_path` after a successful login
pub fn login_redirect(current_path: &str) -> String {
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(current_path))
}

/// Error for a 401 seen while on `current_path`
pub fn unauthorized(current_path: &str) -> Error {
    Error::Unauthorized {
        login_url: login_redirect(current_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_redirect_encodes_current_path() {
        assert_eq!(login_redirect("/app"), "/login?next=%2Fapp");
        assert_eq!(login_redirect("/app/"), "/login?next=%2Fapp%2F");
        assert_eq!(
            login_redirect("/app/check in"),
            "/login?next=%2Fapp%2Fcheck%20in"
        );
    }

    #[test]
    fn test_unauthorized_error() {
        let error = unauthorized("/app");
        assert_eq!(error.login_url(), Some("/login?next=%2Fapp"));
    }
}
