//! Outbound adapters for the external surf API.
//!
//! Provides the reqwest implementation of the `UpstreamHttp` port.

mod http_client;

pub use http_client::{ReqwestUpstreamHttp, SurfApiHttpIdentity};
