//! Domain types, services and ports for the surf session backend.
//!
//! Purpose: keep the session read model, the browse pipeline and the
//! forwarding rules free of transport concerns. Inbound adapters translate
//! HTTP into these calls; outbound adapters implement the ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - TraceId: request-scoped correlation identifier.

pub mod auth;
pub mod auth_proxy;
pub mod compass;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod fetch_chain;
pub mod filter;
pub mod forecast;
pub mod format;
pub mod mock_data;
pub mod ports;
pub mod proxy;
pub mod session_submission;
pub mod sessions;
pub mod surf_api;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use surflog::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
