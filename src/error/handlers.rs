//! Shared classification helpers for HTTP statuses and network errors

use crate::error::{AuthError, TransportError, TransportErrorKind};

const SNIPPET_LIMIT: usize = 256;

/// Maps status codes seen during login and liveness probing.
pub struct AuthStatusHandler;

impl AuthStatusHandler {
    /// 401 and 403 both mean the server does not accept the session or credentials.
    pub fn is_auth_failure(status: u16) -> bool {
        matches!(status, 401 | 403)
    }

    /// Error for a non-2xx login response.
    pub fn login_error(status: u16) -> AuthError {
        if Self::is_auth_failure(status) {
            AuthError::InvalidCredentials
        } else {
            AuthError::Unexpected(status)
        }
    }
}

/// Categorize transport errors.
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    pub fn classify(error: &reqwest::Error) -> TransportError {
        let text = error.to_string();
        let kind = if error.is_timeout() {
            TransportErrorKind::Timeout
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if text.contains("certificate") {
            TransportErrorKind::Tls
        } else {
            TransportErrorKind::Other
        };

        let message = match kind {
            TransportErrorKind::Timeout => format!("request timed out: {}", text),
            TransportErrorKind::Connect => format!("connection error: {}", text),
            TransportErrorKind::Tls => format!("TLS certificate error: {}", text),
            TransportErrorKind::Other => format!("network error: {}", text),
        };

        TransportError::new(kind, message)
    }
}

/// Shortens a response body for display, keeping the full text in the error itself.
pub fn snippet(body: &str) -> String {
    if body.len() <= SNIPPET_LIMIT {
        return body.to_string();
    }
    let mut end = SNIPPET_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
