//! Authentication against the Harbor UI login endpoint
//!
//! Harbor hands out a session cookie (`sid` by default) on a form-encoded
//! login. Deployments fronted by a token service may instead answer with a
//! JSON body holding a `token`/`access_token`, in which case the session
//! switches to bearer authentication. Whatever scheme login establishes is
//! used for every later request until the next login.

use crate::error::handlers::AuthStatusHandler;
use crate::error::AuthError;
use crate::logging::Logger;
use crate::registry::request::{self, RequestDescriptor};
use crate::registry::session::{SessionState, SessionToken};
use crate::registry::transport::{HttpResponse, Transport};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
}

/// Result of a liveness probe on an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Alive,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    login_path: String,
    probe_path: String,
    session_cookie: String,
    output: Logger,
}

impl Authenticator {
    pub fn new(
        login_path: impl Into<String>,
        probe_path: impl Into<String>,
        session_cookie: impl Into<String>,
        output: Logger,
    ) -> Self {
        Self {
            login_path: login_path.into(),
            probe_path: probe_path.into(),
            session_cookie: session_cookie.into(),
            output,
        }
    }

    /// Submits the stored credentials and, on success, stores the issued token.
    ///
    /// The session is left unauthenticated on any failure.
    pub async fn login(
        &self,
        transport: &dyn Transport,
        session: &mut SessionState,
    ) -> Result<SessionToken, AuthError> {
        session.invalidate();

        let credentials = session.credentials();
        self.output.verbose(&format!(
            "Logging in to {} as {}",
            session.base_url(),
            credentials.username
        ));

        let descriptor = RequestDescriptor::post(self.login_path.as_str()).with_form([
            ("principal", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ]);
        let request = request::build(&session.snapshot(), &descriptor)?;

        let response = transport.send(request).await.map_err(|e| {
            self.output.detail(&format!("Login request failed: {}", e));
            AuthError::Unreachable(e)
        })?;

        self.output
            .detail(&format!("Login response status: {}", response.status));

        if !response.is_success() {
            return Err(AuthStatusHandler::login_error(response.status));
        }

        let token = self
            .extract_token(&response)
            .ok_or(AuthError::MissingToken)?;

        self.output.detail(&format!(
            "Session established ({:?}, {} chars)",
            token.scheme,
            token.value.len()
        ));
        session.establish(token.clone());
        Ok(token)
    }

    /// Issues an authenticated GET against the probe endpoint.
    pub async fn probe(
        &self,
        transport: &dyn Transport,
        session: &SessionState,
    ) -> Result<ProbeOutcome, AuthError> {
        let descriptor = RequestDescriptor::get(self.probe_path.as_str());
        let request = request::build(&session.snapshot(), &descriptor)?;

        let response = transport.send(request).await.map_err(AuthError::Unreachable)?;
        self.output
            .detail(&format!("Session probe status: {}", response.status));

        if response.is_success() {
            Ok(ProbeOutcome::Alive)
        } else if AuthStatusHandler::is_auth_failure(response.status) {
            Ok(ProbeOutcome::Expired)
        } else {
            Err(AuthError::Unexpected(response.status))
        }
    }

    /// Logs in when there is no session; otherwise probes it and logs in
    /// again, exactly once, if the server no longer accepts it.
    pub async fn ensure_authenticated(
        &self,
        transport: &dyn Transport,
        session: &mut SessionState,
    ) -> Result<(), AuthError> {
        if !session.is_authenticated() {
            self.login(transport, session).await?;
            return Ok(());
        }

        match self.probe(transport, session).await? {
            ProbeOutcome::Alive => Ok(()),
            ProbeOutcome::Expired => {
                self.output
                    .warning("Session rejected by registry - logging in again...");
                session.invalidate();
                self.login(transport, session).await?;
                self.output.verbose("Re-authentication successful");
                Ok(())
            }
        }
    }

    /// Drops an established session that the server refused on a domain
    /// call. Returns whether the caller should log in and retry.
    pub fn reject_session(&self, session: &mut SessionState, status: u16) -> bool {
        if !AuthStatusHandler::is_auth_failure(status) || !session.is_authenticated() {
            return false;
        }
        self.output.warning(&format!(
            "Request rejected with {}, logging in again...",
            status
        ));
        session.invalidate();
        true
    }

    fn extract_token(&self, response: &HttpResponse) -> Option<SessionToken> {
        for header in response.header_values("set-cookie") {
            if let Some(value) = parse_set_cookie(header, &self.session_cookie) {
                return Some(SessionToken::cookie(self.session_cookie.as_str(), value));
            }
        }

        let parsed: TokenResponse = serde_json::from_slice(&response.body).ok()?;
        parsed
            .token
            .or(parsed.access_token)
            .filter(|t| !t.is_empty())
            .map(SessionToken::bearer)
    }
}

/// Value of cookie `name` in a `Set-Cookie` header, if present and non-empty.
fn parse_set_cookie(header: &str, name: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (key, value) = pair.split_once('=')?;
    if key.trim() == name {
        let value = value.trim().trim_matches('"');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
