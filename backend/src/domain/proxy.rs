//! Stateless forwarder for requests to the external surf API.
//!
//! The proxy makes a single attempt per request. When the origin cannot be
//! reached it substitutes mock session data for session URLs so dependent
//! views stay renderable; every other failure becomes a JSON error body with a
//! gateway status.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};
use url::Url;

use super::mock_data::{mock_session_list_payload, mock_session_payload};
use super::ports::{HttpMethod, UpstreamHttp, UpstreamHttpError, UpstreamRequest};

/// Longest slice of a non-JSON body echoed back to the caller.
pub const NON_JSON_PREVIEW_CHARS: usize = 1000;

const SESSIONS_PATH: &str = "/api/surf-sessions";

/// Envelope describing the real request to forward.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, alias = "authToken")]
    pub auth_token: Option<String>,
}

/// Status and JSON body relayed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: u16,
    pub body: Value,
}

impl ProxyReply {
    fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Join a relative path onto a base URL; absolute URLs pass through.
///
/// # Examples
/// ```
/// use url::Url;
/// use surflog::domain::proxy::resolve_url;
///
/// let base = Url::parse("https://api.example.com/").expect("base");
/// let url = resolve_url(&base, "/api/surf-sessions").expect("url");
/// assert_eq!(url.as_str(), "https://api.example.com/api/surf-sessions");
/// ```
pub fn resolve_url(base: &Url, target: &str) -> Result<Url, url::ParseError> {
    let target = target.trim();
    if target.starts_with("http://") || target.starts_with("https://") {
        return Url::parse(target);
    }
    let base = base.as_str().trim_end_matches('/');
    if target.starts_with('/') {
        Url::parse(&format!("{base}{target}"))
    } else {
        Url::parse(&format!("{base}/{target}"))
    }
}

/// Which mock, if any, stands in for an unreachable session URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockTarget {
    Session(i64),
    SessionList,
}

fn mock_target(url: &Url) -> Option<MockTarget> {
    let path = url.path();
    if !path.contains(SESSIONS_PATH) {
        return None;
    }
    let single = path
        .trim_end_matches('/')
        .rsplit_once(&format!("{SESSIONS_PATH}/"))
        .and_then(|(_, id)| id.parse::<i64>().ok());
    Some(single.map_or(MockTarget::SessionList, MockTarget::Session))
}

/// Proxy forwarder bound to one upstream base URL.
#[derive(Clone)]
pub struct ProxyService {
    http: Arc<dyn UpstreamHttp>,
    clock: Arc<dyn Clock>,
    base_url: Url,
    timeout: Duration,
}

impl ProxyService {
    pub fn new(
        http: Arc<dyn UpstreamHttp>,
        clock: Arc<dyn Clock>,
        base_url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            clock,
            base_url,
            timeout,
        }
    }

    /// Resolve the target and build the upstream request.
    fn prepare(
        &self,
        request: ProxyRequest,
        default_method: HttpMethod,
    ) -> Result<UpstreamRequest, ProxyReply> {
        let Some(target) = request
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Err(ProxyReply::new(400, json!({"message": "URL is required"})));
        };

        let method = match request.method.as_deref() {
            None => default_method,
            Some(raw) => raw.parse::<HttpMethod>().map_err(|err| internal_error(&err))?,
        };
        let url = resolve_url(&self.base_url, target).map_err(|err| internal_error(&err))?;

        let mut upstream = UpstreamRequest::json(method, url, self.timeout);
        for (name, value) in &request.headers {
            upstream = upstream.with_header(name, value);
        }
        if let Some(token) = request.auth_token.as_deref().filter(|t| !t.is_empty()) {
            upstream = upstream.with_bearer(token);
        }
        let upstream = upstream.with_body(request.data);
        info!(
            url = %upstream.url,
            method = %upstream.method,
            has_auth = upstream.header("Authorization").is_some(),
            "forwarding proxy request"
        );
        Ok(upstream)
    }

    /// Forward one request and shape the reply.
    ///
    /// Unreachable session URLs are answered with mock data.
    pub async fn forward(&self, request: ProxyRequest) -> ProxyReply {
        let upstream = match self.prepare(request, HttpMethod::Get) {
            Ok(upstream) => upstream,
            Err(reply) => return reply,
        };
        let url = upstream.url.clone();

        match self.http.send(upstream).await {
            Ok(response) => match serde_json::from_str::<Value>(&response.body) {
                Ok(body) => ProxyReply::new(response.status, body),
                Err(_) => {
                    warn!(%url, status = response.status, "upstream returned a non-JSON body");
                    let text: String = response.body.chars().take(NON_JSON_PREVIEW_CHARS).collect();
                    ProxyReply::new(
                        response.status,
                        json!({
                            "message": "Non-JSON response",
                            "text": text,
                            "status": response.status,
                        }),
                    )
                }
            },
            Err(err) => self.unreachable(&url, err),
        }
    }

    /// Forward without mock substitution. The method defaults to POST.
    ///
    /// Non-2xx replies become `{error, details}` with the origin status and
    /// every other failure is a 500.
    pub async fn forward_plain(&self, request: ProxyRequest) -> ProxyReply {
        let upstream = match self.prepare(request, HttpMethod::Post) {
            Ok(upstream) => upstream,
            Err(reply) => return reply,
        };
        let url = upstream.url.clone();

        let response = match self.http.send(upstream).await {
            Ok(response) => response,
            Err(err) => {
                error!(%url, error = %err, "plain proxy request failed");
                return plain_failure(&err);
            }
        };
        if !response.is_success() {
            error!(%url, status = response.status, "upstream rejected plain proxy request");
            return ProxyReply::new(
                response.status,
                json!({
                    "error": format!("API request failed: {}", response.status),
                    "details": response.body,
                }),
            );
        }
        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => ProxyReply::new(response.status, body),
            Err(err) => plain_failure(&err),
        }
    }

    fn unreachable(&self, url: &Url, err: UpstreamHttpError) -> ProxyReply {
        let today = self.clock.utc().date_naive();
        let fallback = match &err {
            UpstreamHttpError::InvalidRequest { .. } => None,
            UpstreamHttpError::Timeout { .. } | UpstreamHttpError::Transport { .. } => {
                mock_target(url)
            }
        };
        if let Some(target) = fallback {
            warn!(%url, error = %err, ?target, "upstream unreachable; serving mock data");
            let body = match target {
                MockTarget::Session(id) => mock_session_payload(id, today),
                MockTarget::SessionList => mock_session_list_payload(today),
            };
            return ProxyReply::new(200, body);
        }

        error!(%url, error = %err, "proxy request failed");
        match err {
            UpstreamHttpError::Timeout { .. } => ProxyReply::new(
                504,
                json!({
                    "message": "Request timed out",
                    "error": format!(
                        "The request to the API timed out after {} seconds",
                        self.timeout.as_secs()
                    ),
                }),
            ),
            UpstreamHttpError::Transport { message } => ProxyReply::new(
                502,
                json!({"message": "Failed to fetch from API", "error": message}),
            ),
            UpstreamHttpError::InvalidRequest { message } => internal_error(&message),
        }
    }
}

fn plain_failure(err: &dyn std::fmt::Display) -> ProxyReply {
    ProxyReply::new(
        500,
        json!({"error": "Internal server error", "details": err.to_string()}),
    )
}

fn internal_error(err: &dyn std::fmt::Display) -> ProxyReply {
    ProxyReply::new(
        500,
        json!({"message": "Internal server error", "error": err.to_string()}),
    )
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
