//! Request descriptors and the pure request builder

use crate::error::RequestConstructionError;
use crate::registry::session::SessionSnapshot;
use crate::registry::transport::HttpRequest;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::Url;
use url::form_urlencoded;

/// HTTP verbs used by the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// One API call: verb, path relative to the base URL, optional body and extra headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::Head, path)
    }

    /// Attaches a JSON body. Fails if `body` does not serialize.
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, RequestConstructionError> {
        let value = serde_json::to_value(body).map_err(RequestConstructionError::Body)?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn with_form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Percent-encodes a single query parameter value.
pub fn encode_query_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Joins `path` onto the base URL with exactly one `/` between them.
///
/// `.` and `..` segments are rejected, since URL parsing would collapse them
/// and send the request somewhere other than `base/path`.
pub fn resolve_url(base_url: &str, path: &str) -> Result<Url, RequestConstructionError> {
    let relative = path.trim_start_matches('/');
    let path_part = relative.split(['?', '#']).next().unwrap_or_default();
    let has_dot_segment = path_part.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    });
    if relative.is_empty() || relative.contains("://") || has_dot_segment {
        return Err(RequestConstructionError::MalformedPath(path.to_string()));
    }
    let joined = format!("{}/{}", base_url.trim_end_matches('/'), relative);
    Url::parse(&joined).map_err(|_| RequestConstructionError::MalformedPath(path.to_string()))
}

/// Builds the wire request for `descriptor`, attaching the session token when there is one.
pub fn build(
    session: &SessionSnapshot,
    descriptor: &RequestDescriptor,
) -> Result<HttpRequest, RequestConstructionError> {
    let url = resolve_url(&session.base_url, &descriptor.path)?;
    let mut headers = Vec::new();

    let body = match &descriptor.body {
        Some(RequestBody::Json(value)) => {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
            Some(serde_json::to_string(value).map_err(RequestConstructionError::Body)?)
        }
        Some(RequestBody::Form(pairs)) => {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter())
                .finish();
            Some(encoded)
        }
        None => None,
    };

    if let Some(token) = &session.token {
        headers.push(token.header());
    }
    headers.extend(descriptor.headers.iter().cloned());

    Ok(HttpRequest {
        method: descriptor.method,
        url,
        headers,
        body,
    })
}
