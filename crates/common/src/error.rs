//! Common error types shared across crates.

use thiserror::Error;

/// Category of a [`ServiceError`].
///
/// Each kind maps to exactly one HTTP status code returned to callers:
/// - [`ErrorKind::BadRequest`] → 400
/// - [`ErrorKind::NotAllowed`] → 403
/// - [`ErrorKind::NotFound`] → 404
/// - [`ErrorKind::Internal`] → 500
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request body failed validation, or a write was not confirmed.
    BadRequest,
    /// The operation is not permitted: duplicate account ID, missing data key,
    /// or a conflicting concurrent write.
    NotAllowed,
    /// The account, the document, or the bucket does not exist.
    NotFound,
    /// An unexpected failure in a downstream dependency.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code that should be sent for this kind.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotAllowed => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }
}

/// Top-level service error type.
///
/// The message is surfaced verbatim to the caller, so it must never contain
/// key material or account secrets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
}

impl ServiceError {
    /// Construct a [`ServiceError`] of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAllowed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }
}
