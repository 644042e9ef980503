//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP path, the schema wrappers for
//! domain types and the bearer token scheme. Swagger UI serves it in debug
//! builds and `openapi-dump` prints it for tooling.

use crate::inbound::http::dashboard::DashboardResponse;
use crate::inbound::http::directory::{
    SurfSpotBody, SurfSpotsResponse, UserSearchResponse, UserSummaryBody,
};
use crate::inbound::http::forecast::{ForecastHour, ForecastResponse};
use crate::inbound::http::schemas::{
    AuthProxyRequestSchema, ErrorCodeSchema, ErrorSchema, ProxyRequestSchema, SessionDraftSchema,
    SessionUpdateSchema, SubmissionOutcomeSchema,
};
use crate::inbound::http::sessions::{
    LocationCountBody, LocationSessionsResponse, SessionCard, SessionListResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the bearer token scheme used by the protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Token issued by the surf API login, sent with the `x-user-data` header.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Surflog backend API",
        description = "Session logging, browsing, dashboard and forecast views over the external surf API."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::proxy::cors_proxy,
        crate::inbound::http::proxy::plain_proxy,
        crate::inbound::http::proxy::auth_proxy,
        crate::inbound::http::sessions::submit_session,
        crate::inbound::http::sessions::list_sessions,
        crate::inbound::http::sessions::sessions_by_location,
        crate::inbound::http::sessions::get_session,
        crate::inbound::http::sessions::update_session,
        crate::inbound::http::sessions::delete_session,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::forecast::forecast,
        crate::inbound::http::directory::surf_spots,
        crate::inbound::http::directory::search_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProxyRequestSchema,
        AuthProxyRequestSchema,
        SessionDraftSchema,
        SessionUpdateSchema,
        SubmissionOutcomeSchema,
        SessionCard,
        LocationCountBody,
        SessionListResponse,
        LocationSessionsResponse,
        DashboardResponse,
        ForecastHour,
        ForecastResponse,
        SurfSpotBody,
        SurfSpotsResponse,
        UserSummaryBody,
        UserSearchResponse,
    )),
    tags(
        (name = "proxy", description = "Forwarding to the external surf API"),
        (name = "sessions", description = "Logging and browsing surf sessions"),
        (name = "dashboard", description = "Yearly statistics and leaderboards"),
        (name = "forecast", description = "Hourly swell forecasts"),
        (name = "directory", description = "Spot and user lookups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
