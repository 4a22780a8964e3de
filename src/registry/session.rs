//! Session state owned by a single client

use crate::config::AuthConfig;

/// How the session token is presented on each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Cookie: <name>=<value>`
    Cookie { name: String },
    /// `Authorization: Bearer <value>`
    Bearer,
}

/// Token issued by the most recent successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub scheme: AuthScheme,
    pub value: String,
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("scheme", &self.scheme)
            .field("value", &format_args!("<{} chars>", self.value.len()))
            .finish()
    }
}

impl SessionToken {
    pub fn cookie(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: AuthScheme::Cookie { name: name.into() },
            value: value.into(),
        }
    }

    pub fn bearer(value: impl Into<String>) -> Self {
        Self {
            scheme: AuthScheme::Bearer,
            value: value.into(),
        }
    }

    /// Header name and value carrying this token.
    pub fn header(&self) -> (String, String) {
        match &self.scheme {
            AuthScheme::Cookie { name } => ("Cookie".to_string(), format!("{}={}", name, self.value)),
            AuthScheme::Bearer => ("Authorization".to_string(), format!("Bearer {}", self.value)),
        }
    }
}

/// Read-only view handed to the request builder.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub base_url: String,
    pub token: Option<SessionToken>,
}

/// Credentials, base URL and the current token.
///
/// Only the authenticator mutates this; `authenticated` implies a non-empty
/// token from the latest login.
#[derive(Debug)]
pub struct SessionState {
    base_url: String,
    credentials: AuthConfig,
    token: Option<SessionToken>,
    authenticated: bool,
}

impl SessionState {
    pub fn new(base_url: impl Into<String>, credentials: AuthConfig) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            token: None,
            authenticated: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            base_url: self.base_url.clone(),
            token: if self.authenticated {
                self.token.clone()
            } else {
                None
            },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &AuthConfig {
        &self.credentials
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub(super) fn establish(&mut self, token: SessionToken) {
        debug_assert!(!token.value.is_empty());
        self.token = Some(token);
        self.authenticated = true;
    }

    pub(super) fn invalidate(&mut self) {
        self.token = None;
        self.authenticated = false;
    }
}
