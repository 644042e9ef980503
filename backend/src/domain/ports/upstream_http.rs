//! Driven port for outbound HTTP calls to the external surf API.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::define_port_error;

define_port_error! {
    /// Failures raised before a response status is available.
    pub enum UpstreamHttpError {
        /// The call did not complete within its timeout.
        Timeout { message: String } => "upstream request timed out: {message}",
        /// Connection, TLS or protocol failure.
        Transport { message: String } => "upstream transport failed: {message}",
        /// The request could not be built.
        InvalidRequest { message: String } => "upstream request invalid: {message}",
    }
}

/// HTTP method forwarded to the external API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }

    /// Whether a request body is forwarded for this method.
    pub const fn allows_body(self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for methods the proxy does not forward.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct ParseHttpMethodError(pub String);

impl FromStr for HttpMethod {
    type Err = ParseHttpMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            _ => Err(ParseHttpMethodError(s.to_owned())),
        }
    }
}

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// Header pairs in send order; later entries replace earlier ones.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl UpstreamRequest {
    /// A JSON request with the default `Content-Type` and `Accept` headers.
    pub fn json(method: HttpMethod, url: Url, timeout: Duration) -> Self {
        Self {
            method,
            url,
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("Accept".to_owned(), "application/json".to_owned()),
            ],
            body: None,
            timeout,
        }
    }

    /// Set a header, replacing any existing value case-insensitively.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Attach a JSON body. Ignored for methods that carry none.
    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body.filter(|_| self.method.allows_body());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status, content type and raw body of an upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the origin declared a JSON body.
    pub fn declares_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Parse the body as JSON regardless of the declared content type.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Port for issuing HTTP calls to the external API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamHttp: Send + Sync {
    /// Issue one request. There are no retries.
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamHttpError>;
}

/// Stand-in used when no upstream is reachable: every call fails in transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUpstreamHttp;

#[async_trait]
impl UpstreamHttp for FixtureUpstreamHttp {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamHttpError> {
        Err(UpstreamHttpError::transport(format!(
            "no upstream available for {}",
            request.url
        )))
    }
}
