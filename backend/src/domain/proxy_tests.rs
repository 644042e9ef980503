//! Tests for the proxy forwarder.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{MockUpstreamHttp, UpstreamResponse};
use crate::test_support::FixtureClock;

fn base_url() -> Url {
    Url::parse("https://api.example.com").expect("static url")
}

fn service(http: MockUpstreamHttp) -> ProxyService {
    ProxyService::new(
        Arc::new(http),
        Arc::new(FixtureClock::at_ymd(2025, 7, 14)),
        base_url(),
        Duration::from_secs(20),
    )
}

fn request(url: &str) -> ProxyRequest {
    ProxyRequest {
        url: Some(url.to_owned()),
        ..ProxyRequest::default()
    }
}

fn respond(status: u16, body: &str) -> UpstreamResponse {
    UpstreamResponse {
        status,
        content_type: Some("application/json".to_owned()),
        body: body.to_owned(),
    }
}

#[rstest]
#[case(None)]
#[case(Some("   "))]
#[tokio::test]
async fn missing_url_is_rejected_without_a_call(#[case] url: Option<&str>) {
    let mut http = MockUpstreamHttp::new();
    http.expect_send().never();
    let reply = service(http)
        .forward(ProxyRequest {
            url: url.map(str::to_owned),
            ..ProxyRequest::default()
        })
        .await;
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body, json!({"message": "URL is required"}));
}

#[rstest]
#[tokio::test]
async fn relative_urls_are_prefixed_and_headers_merged() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .withf(|req| {
            req.url.as_str() == "https://api.example.com/api/surf-sessions"
                && req.method == HttpMethod::Post
                && req.header("Authorization") == Some("Bearer tok")
                && req.header("Accept") == Some("application/json")
                && req.header("X-Client") == Some("web")
                && req.body == Some(json!({"session_name": "Dawn"}))
        })
        .times(1)
        .returning(|_| Ok(respond(201, r#"{"status":"success","data":{"id":9}}"#)));

    let mut headers = BTreeMap::new();
    headers.insert("X-Client".to_owned(), "web".to_owned());
    let reply = service(http)
        .forward(ProxyRequest {
            url: Some("/api/surf-sessions".to_owned()),
            method: Some("post".to_owned()),
            headers,
            data: Some(json!({"session_name": "Dawn"})),
            auth_token: Some("tok".to_owned()),
        })
        .await;

    assert_eq!(reply.status, 201);
    assert_eq!(reply.body["data"]["id"], json!(9));
}

#[rstest]
#[tokio::test]
async fn get_requests_drop_the_body() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .withf(|req| req.body.is_none() && req.method == HttpMethod::Get)
        .times(1)
        .returning(|_| Ok(respond(200, "[]")));
    let reply = service(http)
        .forward(ProxyRequest {
            data: Some(json!({"ignored": true})),
            ..request("https://other.example.com/api/surf-spots")
        })
        .await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, json!([]));
}

#[rstest]
#[tokio::test]
async fn origin_status_is_relayed_for_json_errors() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .returning(|_| Ok(respond(401, r#"{"status":"error","message":"expired"}"#)));
    let reply = service(http).forward(request("/api/dashboard")).await;
    assert_eq!(reply.status, 401);
    assert_eq!(reply.body["message"], json!("expired"));
}

#[rstest]
#[tokio::test]
async fn non_json_bodies_are_wrapped_and_truncated() {
    let html = "<html>".repeat(400);
    let body = html.clone();
    let mut http = MockUpstreamHttp::new();
    http.expect_send().returning(move |_| {
        Ok(UpstreamResponse {
            status: 502,
            content_type: Some("text/html".to_owned()),
            body: body.clone(),
        })
    });
    let reply = service(http).forward(request("/api/forecast/lido")).await;
    assert_eq!(reply.status, 502);
    assert_eq!(reply.body["message"], json!("Non-JSON response"));
    assert_eq!(reply.body["status"], json!(502));
    let text = reply.body["text"].as_str().expect("text preview");
    assert_eq!(text.chars().count(), NON_JSON_PREVIEW_CHARS);
    assert!(html.starts_with(text));
}

#[rstest]
#[case(UpstreamHttpError::transport("connection refused"))]
#[case(UpstreamHttpError::timeout("20s elapsed"))]
#[tokio::test]
async fn unreachable_session_list_serves_three_mocks(#[case] failure: UpstreamHttpError) {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .times(1)
        .returning(move |_| Err(failure.clone()));
    let reply = service(http).forward(request("/api/surf-sessions")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["status"], json!("success"));
    let data = reply.body["data"].as_array().expect("mock list");
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["date"], json!("2025-07-14"));
    assert_eq!(data[2]["date"], json!("2025-07-12"));
}

#[rstest]
#[tokio::test]
async fn unreachable_single_session_serves_one_mock() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .returning(|_| Err(UpstreamHttpError::transport("refused")));
    let reply = service(http)
        .forward(request("/api/surf-sessions/42"))
        .await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["id"], json!(42));
    assert_eq!(reply.body["session_name"], json!("Mock Session 42"));
}

#[rstest]
#[case(UpstreamHttpError::timeout("elapsed"), 504, "Request timed out")]
#[case(UpstreamHttpError::transport("refused"), 502, "Failed to fetch from API")]
#[case(UpstreamHttpError::invalid_request("bad header"), 500, "Internal server error")]
#[tokio::test]
async fn other_urls_map_failures_to_gateway_errors(
    #[case] failure: UpstreamHttpError,
    #[case] status: u16,
    #[case] message: &str,
) {
    let mut http = MockUpstreamHttp::new();
    http.expect_send().returning(move |_| Err(failure.clone()));
    let reply = service(http).forward(request("/api/dashboard")).await;
    assert_eq!(reply.status, status);
    assert_eq!(reply.body["message"], json!(message));
}

#[rstest]
#[tokio::test]
async fn unsupported_methods_are_internal_errors() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send().never();
    let reply = service(http)
        .forward(ProxyRequest {
            method: Some("TRACE".to_owned()),
            ..request("/api/surf-sessions")
        })
        .await;
    assert_eq!(reply.status, 500);
    assert_eq!(reply.body["message"], json!("Internal server error"));
}

#[rstest]
#[case("https://api.example.com/", "/api/x", "https://api.example.com/api/x")]
#[case("https://api.example.com", "api/x", "https://api.example.com/api/x")]
#[case("https://api.example.com/v1/", "/api/x", "https://api.example.com/v1/api/x")]
#[case("https://api.example.com", "http://elsewhere.test/y", "http://elsewhere.test/y")]
fn resolves_relative_and_absolute_targets(
    #[case] base: &str,
    #[case] target: &str,
    #[case] expected: &str,
) {
    let base = Url::parse(base).expect("base url");
    assert_eq!(
        resolve_url(&base, target).expect("resolved").as_str(),
        expected
    );
}

#[rstest]
#[tokio::test]
async fn plain_forwarding_defaults_to_post() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .withf(|req| req.method == HttpMethod::Post && req.body == Some(json!({"a": 1})))
        .times(1)
        .returning(|_| Ok(respond(200, r#"{"ok":true}"#)));
    let reply = service(http)
        .forward_plain(ProxyRequest {
            data: Some(json!({"a": 1})),
            ..request("/api/surf-sessions")
        })
        .await;
    assert_eq!(reply, ProxyReply::new(200, json!({"ok": true})));
}

#[rstest]
#[tokio::test]
async fn plain_forwarding_wraps_rejections_with_the_origin_status() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .returning(|_| Ok(respond(422, "session_name is required")));
    let reply = service(http).forward_plain(request("/api/surf-sessions")).await;
    assert_eq!(reply.status, 422);
    assert_eq!(
        reply.body,
        json!({"error": "API request failed: 422", "details": "session_name is required"})
    );
}

#[rstest]
#[tokio::test]
async fn plain_forwarding_never_serves_mocks() {
    let mut http = MockUpstreamHttp::new();
    http.expect_send()
        .returning(|_| Err(UpstreamHttpError::transport("refused")));
    let reply = service(http).forward_plain(request("/api/surf-sessions")).await;
    assert_eq!(reply.status, 500);
    assert_eq!(reply.body["error"], json!("Internal server error"));
    assert!(
        reply.body["details"]
            .as_str()
            .is_some_and(|details| details.contains("refused"))
    );
}
