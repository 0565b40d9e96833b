//! Error types for NDO operations.
//!
//! Errors are categorized so callers can tell a dead network from bad
//! credentials or a template that simply does not exist.

use std::fmt;

/// Result type alias for NDO operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of NDO errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// Login rejected or token expired.
    Auth,
    /// Template not found, or not the expected kind.
    NotFound,
    /// Response could not be decoded.
    Format,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::NotFound => "Template not found",
            Self::Format => "Unexpected response format",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check that the host is reachable and try again",
            Self::Auth => "Verify username, password and login domain",
            Self::NotFound => "Verify the template name and that it is a fabric policy template",
            Self::Format => "The orchestrator version may not be supported (ND 3.1 / NDO 4.3 or later)",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur talking to the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Login did not yield a token.
    #[error("login failed for user '{user}': {message}")]
    LoginFailed {
        /// User that tried to log in.
        user: String,
        /// Error message.
        message: String,
    },

    /// No template with the given name and type.
    #[error("template '{name}' not found")]
    TemplateNotFound {
        /// Template name.
        name: String,
    },

    /// Several templates share the given name and type.
    #[error("multiple templates named '{name}' found ({count})")]
    AmbiguousTemplate {
        /// Template name.
        name: String,
        /// Number of matches.
        count: usize,
    },

    /// Template exists but has another type.
    #[error("template '{name}' is of type '{actual}', expected '{expected}'")]
    TemplateTypeMismatch {
        /// Template name.
        name: String,
        /// Type that was required.
        expected: String,
        /// Type the template has.
        actual: String,
    },

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
                status: Some(401 | 403),
                ..
            } => ErrorCategory::Auth,
            Error::HttpError {
                status: Some(404), ..
            } => ErrorCategory::NotFound,
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::LoginFailed { .. } => ErrorCategory::Auth,
            Error::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Error::AmbiguousTemplate { .. } => ErrorCategory::NotFound,
            Error::TemplateTypeMismatch { .. } => ErrorCategory::NotFound,
            Error::InvalidResponse(_) => ErrorCategory::Format,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
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
    fn test_login_failure_advice() {
        let err = Error::LoginFailed {
            user: "admin".to_string(),
            message: "HTTP 401: bad credentials".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert!(err.category().advice().contains("login domain"));
    }

    #[test]
    fn test_http_status_categories() {
        assert_eq!(Error::http("HTTP 401", Some(401)).category(), ErrorCategory::Auth);
        assert_eq!(Error::http("HTTP 403", Some(403)).category(), ErrorCategory::Auth);
        assert_eq!(
            Error::http("HTTP 404", Some(404)).category(),
            ErrorCategory::NotFound
        );
        let err = Error::http("connection refused", None);
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_template_errors() {
        let err = Error::TemplateTypeMismatch {
            name: "tmpl".to_string(),
            expected: "fabricPolicy".to_string(),
            actual: "tenantPolicy".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        let display = err.to_string();
        assert!(display.contains("tenantPolicy"));
        assert!(display.contains("fabricPolicy"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert_eq!(err.category(), ErrorCategory::Format);
    }
}
