//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data`. Everything in it is
//! built on domain ports so handlers stay testable without network or
//! database access.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::auth_proxy::AuthProxyService;
use crate::domain::fetch_chain::FetchChain;
use crate::domain::proxy::ProxyService;
use crate::domain::session_submission::SessionSubmissionService;
use crate::domain::surf_api::SurfApi;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Forwarder behind the CORS proxy and plain proxy routes.
    pub proxy: ProxyService,
    pub auth_proxy: AuthProxyService,
    /// Typed operations against the external API.
    pub api: SurfApi,
    /// Primary, direct, then mock reads for the list views.
    pub chain: FetchChain,
    pub submission: SessionSubmissionService,
    pub clock: Arc<dyn Clock>,
}
