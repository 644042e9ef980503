//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_web::test::TestRequest;
use url::Url;

use crate::domain::auth_proxy::AuthProxyService;
use crate::domain::fetch_chain::FetchChain;
use crate::domain::ports::{FallbackSessionStore, UpstreamHttp};
use crate::domain::proxy::ProxyService;
use crate::domain::session_submission::SessionSubmissionService;
use crate::domain::surf_api::SurfApi;
use crate::inbound::http::auth::USER_DATA_HEADER;
use crate::inbound::http::state::HttpState;
use crate::test_support::FixtureClock;

pub const TEST_TOKEN: &str = "tok";
pub const TEST_USER: &str = r#"{"id":"user-7","display_name":"Kai","email":"kai@example.com"}"#;
pub const PRIMARY_BASE: &str = "https://proxy.example.com/";
pub const DIRECT_BASE: &str = "https://api.example.com/";

fn url(raw: &str) -> Url {
    Url::parse(raw).expect("static test url")
}

/// State wired to the given upstream and fallback store, frozen at
/// 2025-07-14 noon UTC.
pub fn test_state(http: Arc<dyn UpstreamHttp>, store: Arc<dyn FallbackSessionStore>) -> HttpState {
    let clock = Arc::new(FixtureClock::at_ymd(2025, 7, 14));
    let api = SurfApi::new(http.clone(), url(DIRECT_BASE), Duration::from_secs(10));
    HttpState {
        proxy: ProxyService::new(
            http.clone(),
            clock.clone(),
            url(DIRECT_BASE),
            Duration::from_secs(20),
        ),
        auth_proxy: AuthProxyService::new(http.clone(), url(DIRECT_BASE), Duration::from_secs(20)),
        api: api.clone(),
        chain: FetchChain::new(
            http,
            (url(PRIMARY_BASE), Duration::from_secs(15)),
            (url(DIRECT_BASE), Duration::from_secs(10)),
        ),
        submission: SessionSubmissionService::new(api, store, clock.clone()),
        clock,
    }
}

/// Attach the test caller's credentials.
pub fn authed(request: TestRequest) -> TestRequest {
    request
        .insert_header(("Authorization", format!("Bearer {TEST_TOKEN}")))
        .insert_header((USER_DATA_HEADER, TEST_USER))
}
