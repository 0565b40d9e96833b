//! Error types for reconciliation.
//!
//! Every error is fatal to the invocation that raised it. Nothing is retried
//! inside this crate; callers decide what to do with the category.

use std::fmt;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is incomplete.
    Usage,
    /// The remote data violates an invariant or lacks a referenced object.
    Data,
    /// The collaborator failed to fetch or submit.
    Transport,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Usage => "Invalid request",
            Self::Data => "Inconsistent remote data",
            Self::Transport => "Remote call failed",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while reconciling a resource.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// More than one record satisfies a unique-key lookup.
    #[error("multiple {label} found with {key} '{value}' ({count} matches)")]
    AmbiguousMatch {
        /// Kind of object being looked up.
        label: String,
        /// Key used for the lookup.
        key: &'static str,
        /// Value that matched more than once.
        value: String,
        /// Number of matching records.
        count: usize,
    },

    /// A reference name or identifier has no counterpart.
    #[error("provided {label} with {key} '{value}' not matching existing object(s): {existing}")]
    ReferenceNotFound {
        /// Kind of reference entity.
        label: String,
        /// Key used for the lookup.
        key: &'static str,
        /// Value that was not found.
        value: String,
        /// Comma-separated list of what does exist.
        existing: String,
    },

    /// A declared state is missing a field it cannot work without.
    #[error("state is {state} but all of the following are missing: {field}")]
    MissingRequiredField {
        /// Declared state.
        state: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A collection in the template could not be decoded.
    #[error("malformed template at {path}: {message}")]
    MalformedTemplate {
        /// JSON pointer of the collection.
        path: String,
        /// Decoder message.
        message: String,
    },

    /// The collaborator failed.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a collaborator error.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingRequiredField { .. } => ErrorCategory::Usage,
            Error::AmbiguousMatch { .. }
            | Error::ReferenceNotFound { .. }
            | Error::MalformedTemplate { .. } => ErrorCategory::Data,
            Error::Transport(_) => ErrorCategory::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_usage() {
        let err = Error::MissingRequiredField {
            state: "present",
            field: "name",
        };
        assert_eq!(err.category(), ErrorCategory::Usage);
        assert_eq!(
            err.to_string(),
            "state is present but all of the following are missing: name"
        );
    }

    #[test]
    fn test_ambiguous_match_display() {
        let err = Error::AmbiguousMatch {
            label: "Physical Domain".to_string(),
            key: "name",
            value: "dom1".to_string(),
            count: 2,
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        let display = err.to_string();
        assert!(display.contains("Physical Domain"));
        assert!(display.contains("dom1"));
    }

    #[test]
    fn test_transport_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = Error::transport(io_err);
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_transport_from_string() {
        let err = Error::transport("HTTP 503");
        assert_eq!(err.to_string(), "transport failure: HTTP 503");
    }
}
