//! Reqwest-backed upstream adapter.
//!
//! This adapter owns transport details only: method and header translation,
//! the per-request timeout, and error mapping. Status codes are returned to
//! the caller untouched.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};

use crate::domain::ports::{
    HttpMethod, UpstreamHttp, UpstreamHttpError, UpstreamRequest, UpstreamResponse,
};

const DEFAULT_USER_AGENT: &str = "surflog-backend/0.1";

/// Outbound identity sent with every request.
pub struct SurfApiHttpIdentity {
    /// HTTP user-agent sent to the API and the primary proxy.
    pub user_agent: String,
}

impl Default for SurfApiHttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// `UpstreamHttp` adapter sharing one reqwest client across calls.
#[derive(Clone)]
pub struct ReqwestUpstreamHttp {
    client: Client,
}

impl ReqwestUpstreamHttp {
    /// Build an adapter with the default identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_identity(SurfApiHttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(identity: SurfApiHttpIdentity) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(identity.user_agent).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamHttp for ReqwestUpstreamHttp {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamHttpError> {
        let headers = build_headers(&request.headers)?;
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url)
            .headers(headers)
            .timeout(request.timeout);
        if let Some(body) = request.body.as_ref() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(map_transport_error)?;
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, UpstreamHttpError> {
    let mut headers = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
            UpstreamHttpError::invalid_request(format!("invalid header name: {name}"))
        })?;
        if header_name == USER_AGENT {
            continue;
        }
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            UpstreamHttpError::invalid_request(format!("invalid value for header {name}"))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

fn map_transport_error(error: reqwest::Error) -> UpstreamHttpError {
    if error.is_timeout() {
        UpstreamHttpError::timeout(error.to_string())
    } else if error.is_builder() {
        UpstreamHttpError::invalid_request(error.to_string())
    } else {
        UpstreamHttpError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[rstest]
    #[case(HttpMethod::Get, Method::GET)]
    #[case(HttpMethod::Patch, Method::PATCH)]
    #[case(HttpMethod::Head, Method::HEAD)]
    fn methods_translate_one_to_one(#[case] method: HttpMethod, #[case] expected: Method) {
        assert_eq!(to_reqwest_method(method), expected);
    }

    #[test]
    fn headers_are_copied_in_order() {
        let headers = build_headers(&pairs(&[
            ("Content-Type", "application/json"),
            ("Authorization", "Bearer tok"),
        ]))
        .expect("valid headers");
        assert_eq!(headers.len(), 2);
        assert_eq!(
            headers.get("authorization").and_then(|v| v.to_str().ok()),
            Some("Bearer tok")
        );
    }

    #[test]
    fn user_agent_overrides_are_ignored() {
        let headers = build_headers(&pairs(&[("User-Agent", "spoofed")])).expect("valid headers");
        assert!(headers.is_empty());
    }

    #[rstest]
    #[case(&[("bad header", "x")])]
    #[case(&[("X-Note", "line\nbreak")])]
    fn malformed_headers_are_invalid_requests(#[case] raw: &[(&str, &str)]) {
        let error = build_headers(&pairs(raw)).expect_err("header must be rejected");
        assert!(
            matches!(error, UpstreamHttpError::InvalidRequest { .. }),
            "malformed headers should map to InvalidRequest",
        );
    }
}
