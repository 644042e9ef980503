//! Builders for the HTTP state and its port implementations.

use std::sync::Arc;

use mockable::Clock;
use surflog::domain::auth_proxy::AuthProxyService;
use surflog::domain::fetch_chain::FetchChain;
use surflog::domain::ports::{FallbackSessionStore, InMemoryFallbackSessionStore, UpstreamHttp};
use surflog::domain::proxy::ProxyService;
use surflog::domain::session_submission::SessionSubmissionService;
use surflog::domain::surf_api::SurfApi;
use surflog::inbound::http::state::HttpState;
use surflog::outbound::persistence::DieselFallbackSessionStore;
use tracing::warn;

use super::ServerConfig;

/// Pick the fallback store: PostgreSQL when a pool is configured, otherwise
/// process memory.
pub(crate) fn build_fallback_store(config: &ServerConfig) -> Arc<dyn FallbackSessionStore> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselFallbackSessionStore::new(pool.clone())),
        None => {
            warn!("no database configured; fallback sessions are kept in memory");
            Arc::new(InMemoryFallbackSessionStore::new())
        }
    }
}

/// Wire every domain service onto one upstream client and clock.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    http: Arc<dyn UpstreamHttp>,
    clock: Arc<dyn Clock>,
) -> HttpState {
    let upstream = &config.upstream;
    let api = SurfApi::new(
        http.clone(),
        upstream.direct_base.clone(),
        upstream.direct_timeout,
    );
    HttpState {
        proxy: ProxyService::new(
            http.clone(),
            clock.clone(),
            upstream.direct_base.clone(),
            upstream.proxy_timeout,
        ),
        auth_proxy: AuthProxyService::new(
            http.clone(),
            upstream.direct_base.clone(),
            upstream.proxy_timeout,
        ),
        api: api.clone(),
        chain: FetchChain::new(
            http,
            (upstream.primary_base.clone(), upstream.chain_proxy_timeout),
            (upstream.direct_base.clone(), upstream.direct_timeout),
        ),
        submission: SessionSubmissionService::new(api, build_fallback_store(config), clock.clone()),
        clock,
    }
}
