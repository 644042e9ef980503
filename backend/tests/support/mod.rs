//! Shared doubles and state builders for the HTTP integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use surflog::domain::auth_proxy::AuthProxyService;
use surflog::domain::fetch_chain::FetchChain;
use surflog::domain::ports::{
    InMemoryFallbackSessionStore, UpstreamHttp, UpstreamHttpError, UpstreamRequest,
    UpstreamResponse,
};
use surflog::domain::proxy::ProxyService;
use surflog::domain::session_submission::SessionSubmissionService;
use surflog::domain::surf_api::SurfApi;
use surflog::inbound::http::state::HttpState;
use surflog::test_support::FixtureClock;
use url::Url;

pub const USER_JSON: &str = r#"{"id":"user-7","display_name":"Kai"}"#;
pub const PRIMARY_BASE: &str = "https://proxy.example.com/";
pub const DIRECT_BASE: &str = "https://api.example.com/";

type Reply = Result<UpstreamResponse, UpstreamHttpError>;

/// Upstream double that answers from a queue and records every request.
///
/// An empty queue answers with a transport failure.
#[derive(Default)]
pub struct ScriptedUpstream {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedUpstream {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            seen: Mutex::default(),
        }
    }

    pub fn seen_urls(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("seen lock")
            .iter()
            .map(|request| request.url.to_string())
            .collect()
    }
}

#[async_trait]
impl UpstreamHttp for ScriptedUpstream {
    async fn send(&self, request: UpstreamRequest) -> Reply {
        let url = request.url.to_string();
        self.seen.lock().expect("seen lock").push(request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamHttpError::transport(format!("no reply for {url}"))))
    }
}

pub fn json_reply(body: serde_json::Value) -> Reply {
    Ok(UpstreamResponse {
        status: 200,
        content_type: Some("application/json".to_owned()),
        body: body.to_string(),
    })
}

fn url(raw: &str) -> Url {
    Url::parse(raw).expect("static url")
}

/// State over the given upstream, frozen at 2025-07-14 noon UTC.
pub fn state_with(http: Arc<dyn UpstreamHttp>) -> HttpState {
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
        submission: SessionSubmissionService::new(
            api,
            Arc::new(InMemoryFallbackSessionStore::new()),
            clock.clone(),
        ),
        clock,
    }
}
