//! HTTP inbound adapter exposing REST endpoints.
//!
//! [`configure`] registers every API route together with extractor settings
//! that turn malformed JSON bodies and query strings into `invalid_request`
//! errors. Health probes are registered separately by the server.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

pub mod auth;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod forecast;
pub mod health;
pub mod proxy;
pub mod schemas;
pub mod sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Request body must be valid JSON")
        .with_details(json!({"code": "invalid_body", "reason": err.to_string()}))
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request("Query string is malformed")
        .with_details(json!({"code": "invalid_query", "reason": err.to_string()}))
        .into()
}

/// Register the API routes and their extractor configuration.
///
/// # Examples
/// ```
/// use actix_web::App;
///
/// let app = App::new().configure(surflog::inbound::http::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(proxy::cors_proxy)
        .service(proxy::plain_proxy)
        .service(proxy::auth_proxy)
        .service(sessions::submit_session)
        .service(sessions::list_sessions)
        .service(sessions::sessions_by_location)
        .service(sessions::get_session)
        .service(sessions::update_session)
        .service(sessions::delete_session)
        .service(dashboard::dashboard)
        .service(forecast::forecast)
        .service(directory::surf_spots)
        .service(directory::search_users);
}
