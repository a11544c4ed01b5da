//! Error types for HashiCups API operations.
//!
//! Errors are categorized so callers can tell a missing remote object apart
//! from transport or decoding failures. The client never retries; the
//! category is information for the caller, not a retry policy.

use std::fmt;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, timeout, or server-side failure.
    Network,
    /// The requested object does not exist (HTTP 404).
    NotFound,
    /// Missing or rejected credentials (HTTP 401/403).
    Unauthorized,
    /// Response body could not be decoded.
    Format,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::NotFound => "Remote object not found",
            Self::Unauthorized => "Authentication required or rejected",
            Self::Format => "Unexpected response format",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the HashiCups API is reachable at the configured host",
            Self::NotFound => "The object may have been deleted outside of this provider",
            Self::Unauthorized => "Set HASHICUPS_USERNAME and HASHICUPS_PASSWORD",
            Self::Format => "The API version may not match this client",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the HashiCups API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed or returned a non-2xx status.
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// An order lookup found nothing.
    #[error("order {0} not found")]
    OrderNotFound(String),

    /// Order operations need a signed-in client.
    #[error("not signed in: order operations require credentials")]
    NotSignedIn,

    /// Invalid response from API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HttpError {
                status: Some(404), ..
            } => ErrorCategory::NotFound,
            Error::HttpError {
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Unauthorized,
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::OrderNotFound(_) => ErrorCategory::NotFound,
            Error::NotSignedIn => ErrorCategory::Unauthorized,
            Error::InvalidResponse(_) => ErrorCategory::Format,
        }
    }

    /// Whether the remote object is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            ureq::Error::Json(e) => Self::InvalidResponse(e.to_string()),
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_404_is_not_found() {
        let err = Error::http("HTTP 404", Some(404));
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_401_is_unauthorized() {
        let err = Error::http("HTTP 401", Some(401));
        assert_eq!(err.category(), ErrorCategory::Unauthorized);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_transport_error_is_network() {
        let err = Error::http("connection refused", None);
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_order_not_found_category() {
        let err = Error::OrderNotFound("7".to_string());
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "order 7 not found");
    }

    #[test]
    fn test_from_ureq_status() {
        let err: Error = ureq::Error::StatusCode(500).into();
        assert!(matches!(
            err,
            Error::HttpError {
                status: Some(500),
                ..
            }
        ));
        assert_eq!(err.category(), ErrorCategory::Network);
    }
}
