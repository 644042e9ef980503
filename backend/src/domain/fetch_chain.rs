//! Fixed three-step read chain: primary API, direct API, then mock data.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::Error;
use super::envelope::{extract_record, extract_records};
use super::ports::{HttpMethod, UpstreamHttp, UpstreamRequest};
use super::proxy::resolve_url;

/// Where a chain result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchSource {
    Primary,
    Direct,
    Mock,
}

/// Payload shape a step must produce to count as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A list envelope accepted by [`extract_records`].
    Records,
    /// A single-record envelope accepted by [`extract_record`].
    Record,
}

impl ExpectedShape {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Records => extract_records(value.clone()).is_ok(),
            Self::Record => extract_record(value.clone()).is_ok(),
        }
    }
}

/// One read to run through the chain.
#[derive(Debug, Clone)]
pub struct ChainRequest<'a> {
    pub path: &'a str,
    pub token: &'a str,
    pub shape: ExpectedShape,
    /// Last-resort payload; `None` ends the chain in an error.
    pub mock: Option<Value>,
    /// User-facing message when every step fails.
    pub failure_message: &'a str,
}

/// The first payload that satisfied the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    pub value: Value,
    pub source: FetchSource,
}

/// Runs reads against the primary base, then the direct base.
#[derive(Clone)]
pub struct FetchChain {
    http: Arc<dyn UpstreamHttp>,
    primary: (Url, Duration),
    direct: (Url, Duration),
}

impl FetchChain {
    pub fn new(
        http: Arc<dyn UpstreamHttp>,
        primary: (Url, Duration),
        direct: (Url, Duration),
    ) -> Self {
        Self {
            http,
            primary,
            direct,
        }
    }

    pub async fn fetch(&self, request: ChainRequest<'_>) -> Result<ChainOutcome, Error> {
        let steps = [
            (FetchSource::Primary, &self.primary),
            (FetchSource::Direct, &self.direct),
        ];
        for (source, (base, timeout)) in steps {
            match self.attempt(base, *timeout, &request).await {
                Ok(value) => {
                    debug!(path = request.path, ?source, "fetch chain step succeeded");
                    return Ok(ChainOutcome { value, source });
                }
                Err(reason) => {
                    warn!(path = request.path, ?source, %reason, "fetch chain step failed");
                }
            }
        }
        match request.mock {
            Some(value) => {
                warn!(path = request.path, "fetch chain serving mock data");
                Ok(ChainOutcome {
                    value,
                    source: FetchSource::Mock,
                })
            }
            None => Err(Error::service_unavailable(request.failure_message)),
        }
    }

    async fn attempt(
        &self,
        base: &Url,
        timeout: Duration,
        request: &ChainRequest<'_>,
    ) -> Result<Value, String> {
        let url = resolve_url(base, request.path).map_err(|err| err.to_string())?;
        let upstream =
            UpstreamRequest::json(HttpMethod::Get, url, timeout).with_bearer(request.token);
        let response = self
            .http
            .send(upstream)
            .await
            .map_err(|err| err.to_string())?;
        if !response.is_success() {
            return Err(format!("status {}", response.status));
        }
        let value = response
            .json()
            .ok_or_else(|| "response was not JSON".to_owned())?;
        if !request.shape.accepts(&value) {
            return Err("invalid response format".to_owned());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the fetch chain.

    use mockall::Sequence;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUpstreamHttp, UpstreamHttpError, UpstreamResponse};

    fn chain(http: MockUpstreamHttp) -> FetchChain {
        FetchChain::new(
            Arc::new(http),
            (
                Url::parse("https://primary.example.com").expect("url"),
                Duration::from_secs(15),
            ),
            (
                Url::parse("https://direct.example.com").expect("url"),
                Duration::from_secs(10),
            ),
        )
    }

    fn request(mock: Option<Value>) -> ChainRequest<'static> {
        ChainRequest {
            path: "/api/surf-sessions",
            token: "tok",
            shape: ExpectedShape::Records,
            mock,
            failure_message: "Unable to load sessions. Please try again later.",
        }
    }

    fn ok(body: &str) -> UpstreamResponse {
        UpstreamResponse {
            status: 200,
            content_type: Some("application/json".to_owned()),
            body: body.to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn primary_success_short_circuits() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .withf(|req| {
                req.url.host_str() == Some("primary.example.com")
                    && req.timeout == Duration::from_secs(15)
                    && req.header("Authorization") == Some("Bearer tok")
            })
            .times(1)
            .returning(|_| Ok(ok(r#"{"status":"success","data":[]}"#)));
        let outcome = chain(http).fetch(request(None)).await.expect("outcome");
        assert_eq!(outcome.source, FetchSource::Primary);
    }

    #[rstest]
    #[case(Err(UpstreamHttpError::timeout("15s")))]
    #[case(Ok(UpstreamResponse { status: 500, content_type: None, body: "{}".to_owned() }))]
    #[case(Ok(ok(r#"{"status":"error","message":"nope"}"#)))]
    #[case(Ok(ok("<html>")))]
    #[tokio::test]
    async fn falls_through_to_direct(
        #[case] primary: Result<UpstreamResponse, UpstreamHttpError>,
    ) {
        let mut seq = Sequence::new();
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .withf(|req| req.url.host_str() == Some("primary.example.com"))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| primary);
        http.expect_send()
            .withf(|req| {
                req.url.host_str() == Some("direct.example.com")
                    && req.timeout == Duration::from_secs(10)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(ok(r#"[{"id": 1}]"#)));
        let outcome = chain(http).fetch(request(None)).await.expect("outcome");
        assert_eq!(outcome.source, FetchSource::Direct);
        assert_eq!(outcome.value, json!([{"id": 1}]));
    }

    #[rstest]
    #[tokio::test]
    async fn mock_is_the_last_resort() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .times(2)
            .returning(|_| Err(UpstreamHttpError::transport("refused")));
        let outcome = chain(http)
            .fetch(request(Some(json!([{"id": 99}]))))
            .await
            .expect("outcome");
        assert_eq!(outcome.source, FetchSource::Mock);
    }

    #[rstest]
    #[tokio::test]
    async fn exhausted_chain_reports_service_unavailable() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .times(2)
            .returning(|_| Err(UpstreamHttpError::transport("refused")));
        let err = chain(http).fetch(request(None)).await.expect_err("no mock");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), "Unable to load sessions. Please try again later.");
    }

    #[rstest]
    #[tokio::test]
    async fn record_shape_accepts_single_objects() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .times(1)
            .returning(|_| Ok(ok(r#"{"status":"success","data":{"community":{}}}"#)));
        let outcome = chain(http)
            .fetch(ChainRequest {
                shape: ExpectedShape::Record,
                ..request(None)
            })
            .await
            .expect("outcome");
        assert_eq!(outcome.source, FetchSource::Primary);
    }
}
