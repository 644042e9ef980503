//! Proxy HTTP handlers.
//!
//! ```text
//! POST /api/auth/cors-proxy
//! POST /api/proxy
//! POST /api/auth/proxy
//! ```
//!
//! Each route takes a JSON envelope describing the real request and relays
//! the upstream status and body.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use tracing::error;

use crate::domain::auth_proxy::AuthProxyRequest;
use crate::domain::proxy::{ProxyReply, ProxyRequest};
use crate::inbound::http::schemas::{AuthProxyRequestSchema, ProxyRequestSchema};
use crate::inbound::http::state::HttpState;

fn relay(reply: ProxyReply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or_else(|_| {
        error!(status = reply.status, "upstream status is not a valid HTTP status");
        StatusCode::BAD_GATEWAY
    });
    HttpResponse::build(status).json(reply.body)
}

/// Forward a request, answering with mock sessions when the API is down.
#[utoipa::path(
    post,
    path = "/api/auth/cors-proxy",
    request_body = ProxyRequestSchema,
    responses(
        (status = 200, description = "Upstream or mock reply", body = serde_json::Value),
        (status = 400, description = "URL missing", body = serde_json::Value),
        (status = 502, description = "Upstream unreachable", body = serde_json::Value),
        (status = 504, description = "Upstream timed out", body = serde_json::Value)
    ),
    tags = ["proxy"],
    operation_id = "corsProxy",
    security([])
)]
#[post("/api/auth/cors-proxy")]
pub async fn cors_proxy(
    state: web::Data<HttpState>,
    payload: web::Json<ProxyRequest>,
) -> HttpResponse {
    relay(state.proxy.forward(payload.into_inner()).await)
}

/// Forward a request without mock substitution.
#[utoipa::path(
    post,
    path = "/api/proxy",
    request_body = ProxyRequestSchema,
    responses(
        (status = 200, description = "Upstream reply", body = serde_json::Value),
        (status = 400, description = "URL missing", body = serde_json::Value),
        (status = 500, description = "Upstream failure", body = serde_json::Value)
    ),
    tags = ["proxy"],
    operation_id = "plainProxy",
    security([])
)]
#[post("/api/proxy")]
pub async fn plain_proxy(
    state: web::Data<HttpState>,
    payload: web::Json<ProxyRequest>,
) -> HttpResponse {
    relay(state.proxy.forward_plain(payload.into_inner()).await)
}

/// Forward login or signup credentials.
#[utoipa::path(
    post,
    path = "/api/auth/proxy",
    request_body = AuthProxyRequestSchema,
    responses(
        (status = 200, description = "Upstream reply", body = serde_json::Value),
        (status = 400, description = "Missing fields or unknown endpoint", body = serde_json::Value),
        (status = 500, description = "Upstream failure", body = serde_json::Value)
    ),
    tags = ["proxy"],
    operation_id = "authProxy",
    security([])
)]
#[post("/api/auth/proxy")]
pub async fn auth_proxy(
    state: web::Data<HttpState>,
    payload: web::Json<AuthProxyRequest>,
) -> HttpResponse {
    relay(state.auth_proxy.forward(payload.into_inner()).await)
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage: status relay and envelope decoding.

    use std::sync::Arc;

    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{
        FixtureUpstreamHttp, InMemoryFallbackSessionStore, MockUpstreamHttp, UpstreamHttp,
        UpstreamResponse,
    };
    use crate::inbound::http::test_utils::test_state;

    async fn post(http: Arc<dyn UpstreamHttp>, uri: &str, body: Value) -> (StatusCode, Value) {
        let state = test_state(http, Arc::new(InMemoryFallbackSessionStore::new()));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(cors_proxy)
                .service(plain_proxy)
                .service(auth_proxy),
        )
        .await;
        let request = actix_test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn cors_proxy_serves_mocks_when_upstream_is_down() {
        let (status, body) = post(
            Arc::new(FixtureUpstreamHttp),
            "/api/auth/cors-proxy",
            json!({"url": "/api/surf-sessions", "method": "GET"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    }

    #[rstest]
    #[actix_web::test]
    async fn cors_proxy_relays_upstream_status() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send().times(1).returning(|_| {
            Ok(UpstreamResponse {
                status: 404,
                content_type: Some("application/json".to_owned()),
                body: r#"{"message":"gone"}"#.to_owned(),
            })
        });
        let (status, body) = post(
            Arc::new(http),
            "/api/auth/cors-proxy",
            json!({"url": "/api/surf-sessions/99"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "gone"}));
    }

    #[rstest]
    #[case("/api/auth/cors-proxy")]
    #[case("/api/proxy")]
    #[actix_web::test]
    async fn missing_urls_are_rejected(#[case] uri: &str) {
        let mut http = MockUpstreamHttp::new();
        http.expect_send().never();
        let (status, body) = post(Arc::new(http), uri, json!({"method": "GET"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "URL is required"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn plain_proxy_never_substitutes_mocks() {
        let (status, body) = post(
            Arc::new(FixtureUpstreamHttp),
            "/api/proxy",
            json!({"url": "/api/surf-sessions"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("Internal server error"));
    }

    #[rstest]
    #[actix_web::test]
    async fn auth_proxy_checks_required_fields() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send().never();
        let (status, body) = post(
            Arc::new(http),
            "/api/auth/proxy",
            json!({"endpoint": "login", "email": "kai@example.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Missing required fields"}));
    }
}
