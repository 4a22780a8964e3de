//! Error types for the Harbor client
//!
//! Every failure the client can produce falls into one of a handful of
//! enums. `ApiError` is what resource operations return; it wraps the
//! narrower authentication, request-construction and transport errors so the
//! underlying cause travels up to the caller unchanged.

pub mod handlers;

use thiserror::Error;

/// Raised by client construction when the base URL is unusable.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("base URL '{0}' has no host")]
    MissingHost(String),
    #[error("failed to create HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Coarse category of a network-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Tls,
    Other,
}

/// A request never produced an HTTP response.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        handlers::NetworkErrorHandler::classify(&err)
    }
}

/// Login and session failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server refused the username/password pair. Never retried.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("registry unreachable: {0}")]
    Unreachable(#[source] TransportError),
    #[error("unexpected status {0} during authentication")]
    Unexpected(u16),
    /// Login succeeded but the response carried neither a session cookie nor a token.
    #[error("login response did not contain a session token")]
    MissingToken,
    #[error("cannot build authentication request: {0}")]
    Request(#[from] RequestConstructionError),
}

/// The request could not be assembled. Indicates a caller bug.
#[derive(Debug, Error)]
pub enum RequestConstructionError {
    #[error("malformed request path '{0}'")]
    MalformedPath(String),
    #[error("request body is not serializable: {0}")]
    Body(#[source] serde_json::Error),
}

/// Errors returned by the generic call surface and the resource operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("request construction failed: {0}")]
    Request(#[from] RequestConstructionError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("server returned {status}: {}", handlers::snippet(.body))]
    Server { status: u16, body: String },
    #[error("failed to decode response: {source} (body: {})", handlers::snippet(.body))]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl ApiError {
    /// Status code for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
