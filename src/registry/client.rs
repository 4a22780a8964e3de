// HarborClient: owns the session, guarantees an authenticated session before
// every call, builds and dispatches requests and decodes JSON responses.

use crate::config::{
    AuthConfig, ClientConfig, DEFAULT_LOGIN_PATH, DEFAULT_PROBE_PATH, DEFAULT_SESSION_COOKIE,
};
use crate::error::handlers::AuthStatusHandler;
use crate::error::{ApiError, AuthError, ConstructionError, Result};
use crate::logging::Logger;
use crate::registry::auth::Authenticator;
use crate::registry::operations::{ProjectOperations, RepositoryOperations};
use crate::registry::request::{self, RequestDescriptor};
use crate::registry::session::SessionState;
use crate::registry::transport::{HttpResponse, ReqwestTransport, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

pub struct HarborClientBuilder {
    base_url: String,
    auth: AuthConfig,
    skip_tls: bool,
    timeout: Option<Duration>,
    login_path: String,
    probe_path: String,
    session_cookie: String,
    transport: Option<Arc<dyn Transport>>,
    output: Logger,
}

impl HarborClientBuilder {
    pub fn new(base_url: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            skip_tls: false,
            timeout: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            transport: None,
            output: Logger::new_quiet(),
        }
    }

    /// Starts from a [`ClientConfig`], e.g. one loaded from the environment.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.auth.clone())
            .with_skip_tls(config.skip_tls)
            .with_timeout(config.timeout.map(Duration::from_secs))
            .with_login_path(config.login_path.clone())
            .with_probe_path(config.probe_path.clone())
            .with_session_cookie(config.session_cookie.clone())
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_probe_path(mut self, path: impl Into<String>) -> Self {
        self.probe_path = path.into();
        self
    }

    pub fn with_session_cookie(mut self, name: impl Into<String>) -> Self {
        self.session_cookie = name.into();
        self
    }

    /// Replaces the default `reqwest` transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_logger(mut self, output: Logger) -> Self {
        self.output = output;
        self
    }

    /// Validates the base URL and assembles the client. Does not touch the network.
    pub fn build(self) -> std::result::Result<HarborClient, ConstructionError> {
        let base_url = validate_base_url(&self.base_url)?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.skip_tls, self.timeout)?),
        };

        let authenticator = Authenticator::new(
            self.login_path,
            self.probe_path,
            self.session_cookie,
            self.output.clone(),
        );

        Ok(HarborClient {
            transport,
            authenticator,
            session: Mutex::new(SessionState::new(base_url, self.auth)),
            output: self.output,
        })
    }
}

/// Authenticated client for the Harbor management API.
///
/// One async mutex guards the session; each call holds it from the session
/// check until its response arrives, so concurrent callers never race a
/// re-login.
pub struct HarborClient {
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
    session: Mutex<SessionState>,
    output: Logger,
}

impl HarborClient {
    pub fn new(
        base_url: impl Into<String>,
        auth: AuthConfig,
    ) -> std::result::Result<Self, ConstructionError> {
        Self::builder(base_url, auth).build()
    }

    pub fn builder(base_url: impl Into<String>, auth: AuthConfig) -> HarborClientBuilder {
        HarborClientBuilder::new(base_url, auth)
    }

    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConstructionError> {
        HarborClientBuilder::from_config(config).build()
    }

    pub fn projects(&self) -> ProjectOperations<'_> {
        ProjectOperations::new(self)
    }

    pub fn repositories(&self) -> RepositoryOperations<'_> {
        RepositoryOperations::new(self)
    }

    pub async fn base_url(&self) -> String {
        self.session.lock().await.base_url().to_string()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Logs in with the stored credentials, replacing any existing session.
    pub async fn login(&self) -> std::result::Result<(), AuthError> {
        let mut session = self.session.lock().await;
        self.authenticator
            .login(self.transport.as_ref(), &mut session)
            .await?;
        self.output.success("Login successful");
        Ok(())
    }

    pub async fn ensure_authenticated(&self) -> std::result::Result<(), AuthError> {
        let mut session = self.session.lock().await;
        self.authenticator
            .ensure_authenticated(self.transport.as_ref(), &mut session)
            .await
    }

    /// Runs one API call and returns the raw response of a 2xx answer.
    ///
    /// A 401/403 on an established session logs in again and re-sends the
    /// call once; whatever the second attempt returns is final.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse> {
        let mut session = self.session.lock().await;
        self.authenticator
            .ensure_authenticated(self.transport.as_ref(), &mut session)
            .await?;

        let response = self.send(&session, descriptor).await?;
        if response.is_success() {
            return Ok(response);
        }

        if self.authenticator.reject_session(&mut session, response.status) {
            self.authenticator
                .login(self.transport.as_ref(), &mut session)
                .await?;
            let retried = self.send(&session, descriptor).await?;
            if retried.is_success() {
                return Ok(retried);
            }
            if AuthStatusHandler::is_auth_failure(retried.status) {
                session.invalidate();
            }
            return Err(server_error(&retried));
        }

        Err(server_error(&response))
    }

    async fn send(&self, session: &SessionState, descriptor: &RequestDescriptor) -> Result<HttpResponse> {
        let request = request::build(&session.snapshot(), descriptor)?;
        self.output
            .verbose(&format!("{} {}", request.method, request.url));

        let response = self.transport.send(request).await.map_err(|e| {
            self.output.detail(&format!("Request failed: {}", e));
            ApiError::Transport(e)
        })?;
        self.output
            .detail(&format!("Response status: {}", response.status));
        Ok(response)
    }

    /// Runs a call whose response body is not needed.
    pub async fn call(&self, descriptor: RequestDescriptor) -> Result<()> {
        self.execute(&descriptor).await.map(|_| ())
    }

    /// Runs a call and decodes the JSON response body into `T`.
    pub async fn call_json<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let response = self.execute(&descriptor).await?;
        decode(&response)
    }
}

fn server_error(response: &HttpResponse) -> ApiError {
    ApiError::Server {
        status: response.status,
        body: response.text(),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
        source,
        body: response.text(),
    })
}

/// Checks the base URL and returns it without a trailing slash.
fn validate_base_url(raw: &str) -> std::result::Result<String, ConstructionError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| ConstructionError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConstructionError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConstructionError::MissingHost(raw.to_string()));
    }

    Ok(trimmed.to_string())
}
