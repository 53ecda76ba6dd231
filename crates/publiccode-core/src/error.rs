//! Error types for the publiccode-core library
//!
//! Every failure crossing the native boundary is converted into one of
//! exactly three kinds at the boundary itself; no raw native error
//! codes or opaque failure values escape this crate.

use thiserror::Error;

/// Main error type for parser operations
#[derive(Error, Debug)]
pub enum Error {
    /// Engine, session, or content-I/O problems: the library could not
    /// be located or loaded, a session could not be created, a file
    /// could not be read. Not recoverable except by retrying with
    /// different input or configuration.
    #[error("parser error: {message}")]
    Init {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The input is well-formed as a transport format but fails
    /// schema/content rules. The expected, user-actionable outcome for
    /// malformed manifests.
    ///
    /// `errors` preserves every engine-emitted message verbatim and in
    /// emission order, each pre-formatted as
    /// `"<file>:<line>:<column>: <kind>: [<key>: ]<description>"`.
    /// The engine does not guarantee a sorted order; comparisons
    /// against externally generated references must sort both sides.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<String>,
    },

    /// Internal decode inconsistency: the engine returned a payload
    /// this crate could not make sense of. Should not happen with a
    /// healthy engine; always surfaced, never swallowed.
    #[error("internal parser error: {message}")]
    Internal { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn init(message: impl Into<String>) -> Self {
        Error::Init {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn init_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Init {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }

    /// True for the validation kind
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// The individual validation messages, when this is a validation
    /// failure
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Error::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_display() {
        let err = Error::init("failed to create parser");
        assert_eq!(err.to_string(), "parser error: failed to create parser");
    }

    #[test]
    fn test_validation_display_is_joined_messages() {
        let err = Error::Validation {
            message: "publiccode.yml:1:1: error: name: required".to_string(),
            errors: vec!["publiccode.yml:1:1: error: name: required".to_string()],
        };
        assert_eq!(err.to_string(), "publiccode.yml:1:1: error: name: required");
        assert!(err.is_validation());
        assert_eq!(err.validation_errors().map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_non_validation_has_no_error_list() {
        assert!(Error::internal("no data returned from parser")
            .validation_errors()
            .is_none());
        assert!(!Error::init("x").is_validation());
    }

    #[test]
    fn test_init_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::init_with("cannot read publiccode.yml", io);
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
    }
}
