//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod fallback_session_store;
mod upstream_http;

#[cfg(test)]
pub use fallback_session_store::MockFallbackSessionStore;
pub use fallback_session_store::{
    FallbackSessionRecord, FallbackSessionStore, FallbackSessionStoreError,
    InMemoryFallbackSessionStore, StoredSession,
};
#[cfg(test)]
pub use upstream_http::MockUpstreamHttp;
pub use upstream_http::{
    FixtureUpstreamHttp, HttpMethod, ParseHttpMethodError, UpstreamHttp, UpstreamHttpError,
    UpstreamRequest, UpstreamResponse,
};
