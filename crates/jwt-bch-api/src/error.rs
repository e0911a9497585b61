//! Error types for session client operations

use reqwest::StatusCode;

/// Why an HTTP exchange with the auth server failed.
///
/// Keeps the original failure intact so callers can inspect the cause
/// (timeout, refused connection, HTTP status) and decide on retries.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a usable response: timeout, connection
    /// failure, or a body that could not be decoded.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl RequestError {
    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(e) => e.status(),
            Self::Status { status, .. } => Some(*status),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}

/// Errors from session client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    Validation(String),

    #[error("login failed: {0}")]
    Auth(#[source] RequestError),

    #[error("API token request failed: {0}")]
    TokenRequest(#[source] RequestError),

    #[error("API token validation failed: {0}")]
    ValidationRequest(#[source] RequestError),

    #[error("credit update failed: {0}")]
    CreditRequest(#[source] RequestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// The underlying HTTP failure, for errors raised by networked operations.
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Auth(e)
            | Self::TokenRequest(e)
            | Self::ValidationRequest(e)
            | Self::CreditRequest(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.request_error().and_then(RequestError::status)
    }

    pub fn is_timeout(&self) -> bool {
        self.request_error().is_some_and(RequestError::is_timeout)
    }

    pub fn is_connect(&self) -> bool {
        self.request_error().is_some_and(RequestError::is_connect)
    }
}

/// Result alias for session client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(code: u16) -> RequestError {
        RequestError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: "nope".into(),
        }
    }

    #[test]
    fn config_error_display_names_field() {
        let err = Error::Config("missing login".into());
        assert_eq!(err.to_string(), "configuration error: missing login");
    }

    #[test]
    fn status_is_exposed_through_operation_errors() {
        let err = Error::TokenRequest(status_error(401));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(!err.is_timeout());
        assert!(!err.is_connect());
        assert!(
            err.to_string().contains("401"),
            "display should carry the status, got: {err}"
        );
    }

    #[test]
    fn non_request_errors_have_no_request_error() {
        let err = Error::Validation("apiLevel must be a positive integer".into());
        assert!(err.request_error().is_none());
        assert!(err.status().is_none());
    }

    #[test]
    fn source_chain_reaches_request_error() {
        use std::error::Error as _;

        let err = Error::Auth(status_error(500));
        let source = err.source().expect("auth error has a source");
        assert!(source.to_string().starts_with("server returned 500"));
    }
}
