//! Client configuration: credentials, endpoint paths and transport settings

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LOGIN_PATH: &str = "c/login";
pub const DEFAULT_PROBE_PATH: &str = "api/users/current";
pub const DEFAULT_SESSION_COOKIE: &str = "sid";

pub const ENV_URL: &str = "HARBOR_URL";
pub const ENV_USERNAME: &str = "HARBOR_USERNAME";
pub const ENV_PASSWORD: &str = "HARBOR_PASSWORD";
pub const ENV_SKIP_TLS: &str = "HARBOR_SKIP_TLS";
pub const ENV_TIMEOUT: &str = "HARBOR_TIMEOUT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("{0}")]
    Validation(String),
}

/// Login credentials
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything needed to construct a [`crate::HarborClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub auth: AuthConfig,
    pub skip_tls: bool,
    /// Per-request timeout in seconds; `None` keeps the transport default.
    pub timeout: Option<u64>,
    pub login_path: String,
    pub probe_path: String,
    pub session_cookie: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            base_url: base_url.into(),
            auth,
            skip_tls: false,
            timeout: None,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    pub fn with_skip_tls(mut self, skip_tls: bool) -> Self {
        self.skip_tls = skip_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
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

    /// Reads `HARBOR_URL`, `HARBOR_USERNAME`, `HARBOR_PASSWORD`,
    /// `HARBOR_SKIP_TLS` and `HARBOR_TIMEOUT` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        let username = lookup(ENV_USERNAME).ok_or(ConfigError::Missing(ENV_USERNAME))?;
        let password = lookup(ENV_PASSWORD).ok_or(ConfigError::Missing(ENV_PASSWORD))?;
        let skip_tls = lookup(ENV_SKIP_TLS).is_some_and(|v| v == "true" || v == "1");
        let timeout = match lookup(ENV_TIMEOUT) {
            Some(value) => Some(value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: ENV_TIMEOUT,
                value,
            })?),
            None => None,
        };

        Ok(Self::new(base_url, AuthConfig::new(username, password))
            .with_skip_tls(skip_tls)
            .with_timeout(timeout))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "Registry address cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "Invalid registry address: {}. Must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout == Some(0) {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        self.auth.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_from_environment_lookup() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://harbor.example.com:5443"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
            (ENV_SKIP_TLS, "true"),
            (ENV_TIMEOUT, "30"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://harbor.example.com:5443");
        assert_eq!(config.auth, AuthConfig::new("admin", "secret"));
        assert!(config.skip_tls);
        assert_eq!(config.timeout, Some(30));
        assert_eq!(config.login_path, DEFAULT_LOGIN_PATH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_url_is_reported() {
        let err = ClientConfig::from_lookup(lookup_from(&[(ENV_USERNAME, "admin")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_URL));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            (ENV_URL, "https://h"),
            (ENV_USERNAME, "a"),
            (ENV_PASSWORD, "b"),
            (ENV_TIMEOUT, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_TIMEOUT, .. }));
    }

    #[test]
    fn validation_rejects_bad_scheme_and_empty_password() {
        let config = ClientConfig::new("ftp://harbor", AuthConfig::new("admin", "pw"));
        assert!(config.validate().is_err());

        let config = ClientConfig::new("https://harbor", AuthConfig::new("admin", ""));
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Validation("Password cannot be empty".to_string())
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let auth = AuthConfig::new("admin", "hunter2");
        let text = format!("{:?}", auth);
        assert!(text.contains("admin"));
        assert!(!text.contains("hunter2"));
    }
}
