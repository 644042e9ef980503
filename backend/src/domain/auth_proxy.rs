//! Login and signup forwarding to the external API.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};
use url::Url;
use zeroize::Zeroizing;

use super::ports::{HttpMethod, UpstreamHttp, UpstreamRequest};
use super::proxy::{ProxyReply, resolve_url};

/// Authentication endpoint exposed by the external API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEndpoint {
    Login,
    Signup,
}

impl AuthEndpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
        }
    }
}

impl fmt::Display for AuthEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthEndpoint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "signup" => Ok(Self::Signup),
            _ => Err(()),
        }
    }
}

/// Credentials envelope posted by the login and signup forms.
#[derive(Clone, Default, Deserialize)]
pub struct AuthProxyRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<Zeroizing<String>>,
}

impl fmt::Debug for AuthProxyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthProxyRequest")
            .field("endpoint", &self.endpoint)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Forwards credentials and relays the API's reply.
#[derive(Clone)]
pub struct AuthProxyService {
    http: Arc<dyn UpstreamHttp>,
    base_url: Url,
    timeout: Duration,
}

impl AuthProxyService {
    pub fn new(http: Arc<dyn UpstreamHttp>, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    pub async fn forward(&self, request: AuthProxyRequest) -> ProxyReply {
        let (Some(endpoint), Some(email), Some(password)) = (
            present(request.endpoint.as_deref()),
            present(request.email.as_deref()),
            present(request.password.as_deref().map(String::as_str)),
        ) else {
            return reply(400, json!({"message": "Missing required fields"}));
        };
        let Ok(endpoint) = endpoint.parse::<AuthEndpoint>() else {
            return reply(400, json!({"message": "Invalid endpoint"}));
        };

        let url = match resolve_url(&self.base_url, &format!("/api/auth/{endpoint}")) {
            Ok(url) => url,
            Err(err) => return processing_error(&err),
        };
        info!(%url, %endpoint, "forwarding auth request");
        let upstream = UpstreamRequest::json(HttpMethod::Post, url, self.timeout)
            .with_body(Some(json!({"email": email, "password": password})));

        let response = match self.http.send(upstream).await {
            Ok(response) => response,
            Err(err) => {
                error!(%endpoint, error = %err, "auth proxy request failed");
                return processing_error(&err);
            }
        };
        match response.json().filter(|_| response.declares_json()) {
            Some(body) => reply(response.status, body),
            None => {
                let preview: String = response.body.chars().take(200).collect();
                error!(%endpoint, status = response.status, %preview, "non-JSON auth response");
                reply(
                    500,
                    json!({
                        "message": "The API returned a non-JSON response",
                        "error": "API communication error",
                        "details": format!(
                            "Status: {}, Content-Type: {}",
                            response.status,
                            response.content_type.as_deref().unwrap_or("unknown")
                        ),
                    }),
                )
            }
        }
    }
}

fn reply(status: u16, body: Value) -> ProxyReply {
    ProxyReply { status, body }
}

fn processing_error(err: &dyn fmt::Display) -> ProxyReply {
    reply(
        500,
        json!({
            "message": "An error occurred while processing your request",
            "error": err.to_string(),
        }),
    )
}
