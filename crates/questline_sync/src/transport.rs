//! Mapping HTTP client failures onto transport errors.

use questline_error::{TransportError, TransportErrorKind};

/// Classify a failed request.
///
/// Timeouts and refused or unresolvable connections get their own kinds because the
/// sources recover from them differently.
pub(crate) fn transport_error(error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout(error.to_string())
    } else if error.is_connect() {
        TransportErrorKind::Unreachable(error.to_string())
    } else if error.is_decode() || error.is_body() {
        TransportErrorKind::InvalidResponse(error.to_string())
    } else {
        TransportErrorKind::Other(error.to_string())
    };
    tracing::debug!(error = %kind, "Request failed");
    TransportError::new(kind)
}
