//! Surf session HTTP handlers.
//!
//! ```text
//! POST   /api/surf-sessions
//! GET    /api/sessions
//! GET    /api/sessions/location/{location}
//! GET    /api/sessions/{id}
//! PUT    /api/sessions/{id}
//! DELETE /api/sessions/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::domain::compass::{Sectors, cardinal};
use crate::domain::envelope::{decode_sessions, extract_records};
use crate::domain::fetch_chain::{ChainRequest, ExpectedShape, FetchSource};
use crate::domain::filter::{
    DateRange, DirectionFilter, FilterContext, LocationCount, RangeBucket, SessionFilter,
    SessionQuery, SortDirection, SortField, SortState, browse, surfer_names, top_locations,
};
use crate::domain::format::{capitalize_location, format_participants, format_time_of_day};
use crate::domain::mock_data::mock_session_list_payload;
use crate::domain::session_submission::SubmissionOutcome;
use crate::domain::sessions::{SessionDraft, SessionUpdate, SurfSession};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    ErrorSchema, SessionDraftSchema, SessionUpdateSchema, SubmissionOutcomeSchema,
};
use crate::inbound::http::state::HttpState;

const SESSIONS_PATH: &str = "/api/surf-sessions";
const LIST_FAILURE: &str = "Unable to load sessions. Please try again later.";
const TOP_LOCATION_LIMIT: usize = 5;

/// Filter and sort state of the session list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseParams {
    /// Location substring, case-insensitive.
    pub location: Option<String>,
    /// `any`, `past7`, `past30`, `thisMonth`, `thisYear`, `lastYear` or a
    /// four-digit year.
    pub date_range: Option<String>,
    /// Minimum fun rating, 1 to 10.
    pub min_rating: Option<u8>,
    /// Height bucket in feet, such as `2-4` or `6+`.
    pub swell_height: Option<String>,
    /// Period bucket in seconds, such as `8-12` or `16+`.
    pub swell_period: Option<String>,
    /// Compass label such as `S`, `SW` or `SSW`.
    pub swell_direction: Option<String>,
    /// Surfer display name, exact match ignoring case; `any` for everyone.
    pub surfer: Option<String>,
    /// Text matched against the session notes, ignoring case.
    pub keywords: Option<String>,
    /// Only the caller's own sessions.
    #[serde(default)]
    pub mine_only: bool,
    /// Sort column.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
}

fn invalid_param(field: &str, value: &str, err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_query",
    }))
}

fn parse_param<T>(field: &str, raw: Option<&str>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("any"))
        .map(|value| value.parse::<T>().map_err(|err| invalid_param(field, value, err)))
        .transpose()
}

fn blank_to_none(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

/// Free-text select whose `any` option leaves the filter off.
fn selected(raw: Option<String>) -> Option<String> {
    blank_to_none(raw).filter(|value| !value.trim().eq_ignore_ascii_case("any"))
}

impl TryFrom<BrowseParams> for SessionQuery {
    type Error = Error;

    fn try_from(params: BrowseParams) -> Result<Self, Self::Error> {
        let date_range = match params.date_range.as_deref() {
            Some(raw) => raw
                .parse::<DateRange>()
                .map_err(|err| invalid_param("date_range", raw, err))?,
            None => DateRange::default(),
        };
        if let Some(rating) = params.min_rating.filter(|r| !(1..=10).contains(r)) {
            return Err(invalid_param(
                "min_rating",
                &rating.to_string(),
                "min_rating must be between 1 and 10",
            ));
        }
        let defaults = SortState::default();
        let sort = SortState {
            field: parse_param::<SortField>("sort", params.sort.as_deref())?
                .unwrap_or(defaults.field),
            direction: parse_param::<SortDirection>("direction", params.direction.as_deref())?
                .unwrap_or(defaults.direction),
        };
        Ok(Self {
            filter: SessionFilter {
                location: blank_to_none(params.location),
                date_range,
                min_fun_rating: params.min_rating,
                swell_height: parse_param::<RangeBucket>(
                    "swell_height",
                    params.swell_height.as_deref(),
                )?,
                swell_period: parse_param::<RangeBucket>(
                    "swell_period",
                    params.swell_period.as_deref(),
                )?,
                swell_direction: parse_param::<DirectionFilter>(
                    "swell_direction",
                    params.swell_direction.as_deref(),
                )?,
                surfer: selected(params.surfer),
                keywords: blank_to_none(params.keywords),
                mine_only: params.mine_only,
            },
            sort,
        })
    }
}

/// A session with the labels the list view renders.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionCard {
    #[schema(value_type = Object)]
    pub session: SurfSession,
    pub location_label: String,
    pub participants_label: String,
    pub start_label: String,
    pub end_label: String,
    /// Sixteen-point label of the primary swell bearing.
    pub swell_direction_label: Option<String>,
}

impl From<&SurfSession> for SessionCard {
    fn from(session: &SurfSession) -> Self {
        Self {
            location_label: capitalize_location(&session.location),
            participants_label: format_participants(&session.participants),
            start_label: format_time_of_day(session.time.as_deref().unwrap_or_default()),
            end_label: format_time_of_day(session.end_time.as_deref().unwrap_or_default()),
            swell_direction_label: session
                .primary_swell()
                .and_then(|swell| swell.direction)
                .and_then(|degrees| cardinal(degrees, Sectors::Sixteen))
                .map(str::to_owned),
            session: session.clone(),
        }
    }
}

/// Session count at one location.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationCountBody {
    pub location: String,
    pub sessions: usize,
}

impl From<LocationCount> for LocationCountBody {
    fn from(value: LocationCount) -> Self {
        Self {
            location: capitalize_location(&value.location),
            sessions: value.sessions,
        }
    }
}

/// Response payload for the session list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// `primary`, `direct` or `mock`.
    #[schema(value_type = String, example = "primary")]
    pub source: FetchSource,
    /// Set when the list is empty.
    pub message: Option<String>,
    pub sessions: Vec<SessionCard>,
    /// Surfer names over the unfiltered list.
    pub surfer_names: Vec<String>,
    /// Most logged locations over the unfiltered list.
    pub top_locations: Vec<LocationCountBody>,
}

/// Response payload for a location's sessions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LocationSessionsResponse {
    pub location: String,
    pub sessions: Vec<SessionCard>,
}

/// Path parameters naming one session.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionPath {
    /// Session identifier.
    pub id: i64,
}

/// Path parameters naming one location.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationPath {
    /// Location name as logged.
    pub location: String,
}

/// Log a session, falling back to the local table when the API is down.
#[utoipa::path(
    post,
    path = "/api/surf-sessions",
    request_body = SessionDraftSchema,
    responses(
        (status = 201, description = "Session stored", body = SubmissionOutcomeSchema),
        (status = 400, description = "Invalid session", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "No store accepted the session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "submitSession",
    security(("BearerToken" = []))
)]
#[post("/api/surf-sessions")]
pub async fn submit_session(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SessionDraft>,
) -> ApiResult<HttpResponse> {
    let outcome: SubmissionOutcome = state.submission.submit(&auth, &payload).await?;
    Ok(HttpResponse::Created().json(outcome))
}

/// Browse the session list with filters and sorting.
#[utoipa::path(
    get,
    path = "/api/sessions",
    params(BrowseParams),
    responses(
        (status = 200, description = "Filtered sessions", body = SessionListResponse),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "listSessions",
    security(("BearerToken" = []))
)]
#[get("/api/sessions")]
pub async fn list_sessions(
    state: web::Data<HttpState>,
    auth: Authenticated,
    params: web::Query<BrowseParams>,
) -> ApiResult<web::Json<SessionListResponse>> {
    let query = SessionQuery::try_from(params.into_inner())?;
    let today = state.clock.utc().date_naive();
    let outcome = state
        .chain
        .fetch(ChainRequest {
            path: SESSIONS_PATH,
            token: auth.token(),
            shape: ExpectedShape::Records,
            mock: Some(mock_session_list_payload(today)),
            failure_message: LIST_FAILURE,
        })
        .await?;
    let records = extract_records(outcome.value).map_err(|err| Error::bad_gateway(err.to_string()))?;
    let sessions = decode_sessions(records);

    let ctx = FilterContext {
        today,
        current_user_id: Some(auth.user_id()),
    };
    let browsed = browse(&sessions, &query, &ctx);
    Ok(web::Json(SessionListResponse {
        source: outcome.source,
        message: browsed.message().map(str::to_owned),
        sessions: browsed.sessions().iter().map(|s| SessionCard::from(*s)).collect(),
        surfer_names: surfer_names(&sessions),
        top_locations: top_locations(&sessions, TOP_LOCATION_LIMIT)
            .into_iter()
            .map(LocationCountBody::from)
            .collect(),
    }))
}

/// Sessions logged at one location, newest first.
#[utoipa::path(
    get,
    path = "/api/sessions/location/{location}",
    params(LocationPath),
    responses(
        (status = 200, description = "Sessions at the location", body = LocationSessionsResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 502, description = "API failure", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "listSessionsByLocation",
    security(("BearerToken" = []))
)]
#[get("/api/sessions/location/{location}")]
pub async fn sessions_by_location(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<LocationPath>,
) -> ApiResult<web::Json<LocationSessionsResponse>> {
    let LocationPath { location } = path.into_inner();
    let sessions = state
        .api
        .sessions_by_location(auth.token(), &location)
        .await?;
    let mut refs: Vec<&SurfSession> = sessions.iter().collect();
    SortState::default().apply(&mut refs);
    let cards = refs.into_iter().map(SessionCard::from).collect();
    Ok(web::Json(LocationSessionsResponse {
        location: capitalize_location(&location),
        sessions: cards,
    }))
}

/// Fetch one session.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(SessionPath),
    responses(
        (status = 200, description = "The session", body = SessionCard),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "getSession",
    security(("BearerToken" = []))
)]
#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<SessionPath>,
) -> ApiResult<web::Json<SessionCard>> {
    let session = state.api.get_session(auth.token(), path.id).await?;
    Ok(web::Json(SessionCard::from(&session)))
}

/// Edit the supplied fields of a session.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    params(SessionPath),
    request_body = SessionUpdateSchema,
    responses(
        (status = 200, description = "API reply", body = serde_json::Value),
        (status = 400, description = "Invalid update", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "updateSession",
    security(("BearerToken" = []))
)]
#[put("/api/sessions/{id}")]
pub async fn update_session(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<SessionPath>,
    payload: web::Json<SessionUpdate>,
) -> ApiResult<web::Json<Value>> {
    let body = payload.to_api_payload()?;
    let reply = state
        .api
        .update_session(auth.token(), path.id, body)
        .await?;
    Ok(web::Json(reply))
}

/// Delete a session.
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(SessionPath),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "No such session", body = ErrorSchema)
    ),
    tags = ["sessions"],
    operation_id = "deleteSession",
    security(("BearerToken" = []))
)]
#[delete("/api/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<SessionPath>,
) -> ApiResult<HttpResponse> {
    state.api.delete_session(auth.token(), path.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod tests;
