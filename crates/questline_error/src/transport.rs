//! Raw remote failures, before any retry or cache fallback is applied.

/// What went wrong talking to a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// The server answered with a non-success status code
    #[display("HTTP {} response", status)]
    Status {
        /// HTTP status code
        status: u16,
        /// Machine-readable `code` field from the error body, if any
        code: Option<String>,
        /// Human-readable `error` field from the error body, if any
        message: Option<String>,
    },
    /// The request did not complete within the configured timeout
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// The host could not be reached at all
    #[display("Network unreachable: {}", _0)]
    Unreachable(String),
    /// The server answered successfully but reported a business error in the body
    #[display("Request rejected: {}", _0)]
    Rejected(String),
    /// The body was missing or did not have the expected shape
    #[display("Invalid response: {}", _0)]
    InvalidResponse(String),
    /// Any other failure
    #[display("Transport failure: {}", _0)]
    Other(String),
}

impl TransportErrorKind {
    /// HTTP status code, for `Status` failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportErrorKind::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The body's `code` field, for `Status` failures.
    pub fn body_code(&self) -> Option<&str> {
        match self {
            TransportErrorKind::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The server-provided error text, from an error body or a rejection.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportErrorKind::Status { message, .. } => message.as_deref(),
            TransportErrorKind::Rejected(message) => Some(message),
            _ => None,
        }
    }

    /// True for timeouts and aborted connections.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportErrorKind::Timeout(_))
    }

    /// True when the host could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportErrorKind::Unreachable(_))
    }
}

/// Transport error with location tracking.
///
/// # Examples
///
/// ```
/// use questline_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::Status {
///     status: 404,
///     code: None,
///     message: None,
/// });
/// assert_eq!(err.kind().status(), Some(404));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new transport error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }
}

/// Result type for remote calls.
pub type TransportResult<T> = Result<T, TransportError>;
