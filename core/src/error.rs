//! Error type shared by every pipeline stage.
//!
//! # Design
//! Failures are ordinary return values. Every stage returns
//! `SdkResult<T>` and the first error short-circuits the rest of the
//! pipeline. `ErrorKind` is a closed set so callers can branch on the
//! category of a failure without parsing messages; the optional `cause`
//! carries the underlying library error for diagnostics only.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Result type returned by every stage.
pub type SdkResult<T> = Result<T, SdkError>;

/// Underlying error carried by an `SdkError`.
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync>;

/// Category of an `SdkError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The transport could not complete the exchange (e.g. network unreachable).
    HttpClient,

    /// A caller supplied an unusable value, such as a missing path parameter.
    IllegalArgument,

    /// A value was in a state the stage cannot handle, such as an
    /// already-resolved URL or an unknown unstructured data variant.
    IllegalState,

    /// A header value was expected to be an integer and was not.
    InvalidNumber,

    /// A request body could not be converted to unstructured data.
    Marshalling,

    /// A response body could not be converted, or no unmarshaller claimed it.
    Unmarshalling,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::HttpClient => "http-client-error",
            ErrorKind::IllegalArgument => "illegal-argument-error",
            ErrorKind::IllegalState => "illegal-state-error",
            ErrorKind::InvalidNumber => "invalid-number-error",
            ErrorKind::Marshalling => "marshalling-error",
            ErrorKind::Unmarshalling => "unmarshalling-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by pipeline stages and injected collaborators.
#[derive(Debug, Clone, Error)]
#[error("{kind} - {message}")]
pub struct SdkError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub cause: Option<ErrorCause>,
}

impl SdkError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying error that produced this one.
    pub fn with_cause<C>(mut self, cause: C) -> Self
    where
        C: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn http_client(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HttpClient, message)
    }

    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalArgument, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState, message)
    }

    pub fn invalid_number(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNumber, message)
    }

    pub fn marshalling(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Marshalling, message)
    }

    pub fn unmarshalling(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unmarshalling, message)
    }
}
