//! Dashboard HTTP handler.
//!
//! ```text
//! GET /api/dashboard?year=2025
//! ```

use actix_web::{get, web};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::dashboard::{DashboardStats, DashboardView};
use crate::domain::envelope::extract_record;
use crate::domain::fetch_chain::{ChainRequest, ExpectedShape, FetchSource};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const DASHBOARD_PATH: &str = "/api/dashboard";
const DASHBOARD_FAILURE: &str = "Unable to load dashboard data. Please try again later.";

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// Year to show; defaults to the current year when it has data, else
    /// the latest year that does.
    pub year: Option<i32>,
}

/// Response payload for the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    /// `primary` or `direct`.
    #[schema(value_type = String, example = "primary")]
    pub source: FetchSource,
    /// Formatted summaries and leaderboards for the selected year.
    #[schema(value_type = Object)]
    pub view: DashboardView,
    /// The aggregates as decoded from the API.
    #[schema(value_type = Object)]
    pub stats: DashboardStats,
}

fn decode_stats(value: Value) -> Result<DashboardStats, Error> {
    let record = extract_record(value).map_err(|err| Error::bad_gateway(err.to_string()))?;
    serde_json::from_value(Value::Object(record)).map_err(|err| {
        warn!(error = %err, "dashboard payload did not decode");
        Error::bad_gateway("Invalid response format from API")
    })
}

/// Personal, community and leaderboard statistics.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard for the selected year", body = DashboardResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "No data source answered", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard",
    security(("BearerToken" = []))
)]
#[get("/api/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    auth: Authenticated,
    params: web::Query<DashboardParams>,
) -> ApiResult<web::Json<DashboardResponse>> {
    let outcome = state
        .chain
        .fetch(ChainRequest {
            path: DASHBOARD_PATH,
            token: auth.token(),
            shape: ExpectedShape::Record,
            mock: None,
            failure_message: DASHBOARD_FAILURE,
        })
        .await?;
    let stats = decode_stats(outcome.value)?;
    let current_year = state.clock.utc().year();
    let view = DashboardView::build(&stats, params.year, current_year, Some(auth.user()));
    Ok(web::Json(DashboardResponse {
        source: outcome.source,
        view,
        stats,
    }))
}

#[cfg(test)]
mod tests {
    //! Handler coverage for year selection and the no-mock failure path.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{
        FixtureUpstreamHttp, InMemoryFallbackSessionStore, MockUpstreamHttp, UpstreamHttp,
        UpstreamHttpError, UpstreamResponse,
    };
    use crate::inbound::http::test_utils::{authed, test_state};

    fn stats_body() -> String {
        json!({
            "status": "success",
            "data": {
                "community": {"total_sessions": 40, "total_stoke": "301.4", "total_surf_time_minutes": 2400},
                "current_user": {
                    "total_sessions_all_time": 9,
                    "yearly_stats": {
                        "2024": {"total_sessions": 3, "total_surf_time_minutes": 180, "avg_fun_rating": 6},
                        "2025": {"total_sessions": 6, "total_surf_time_minutes": "420", "avg_fun_rating": "7.5"}
                    }
                },
                "other_users": [
                    {"user_id": "u-2", "display_name": "Ana", "yearly_stats": {"2025": {"total_sessions": 8}}}
                ]
            }
        })
        .to_string()
    }

    async fn get(http: Arc<dyn UpstreamHttp>, uri: &str) -> (StatusCode, serde_json::Value) {
        let state = test_state(http, Arc::new(InMemoryFallbackSessionStore::new()));
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(dashboard),
        )
        .await;
        let response =
            actix_test::call_service(&app, authed(actix_test::TestRequest::get().uri(uri)).to_request())
                .await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    fn direct_only() -> MockUpstreamHttp {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .withf(|req| req.url.host_str() == Some("proxy.example.com"))
            .times(1)
            .returning(|_| Err(UpstreamHttpError::timeout("15s")));
        http.expect_send()
            .withf(|req| {
                req.url.host_str() == Some("api.example.com") && req.url.path() == "/api/dashboard"
            })
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse {
                    status: 200,
                    content_type: Some("application/json".to_owned()),
                    body: stats_body(),
                })
            });
        http
    }

    #[rstest]
    #[actix_web::test]
    async fn defaults_to_the_current_year_from_the_direct_source() {
        let (status, body) = get(Arc::new(direct_only()), "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], json!("direct"));
        assert_eq!(body["view"]["year"], json!(2025));
        assert_eq!(body["view"]["available_years"], json!([2025, 2024]));
        assert_eq!(body["view"]["you"]["surf_hours"], json!("7.0"));
        assert_eq!(body["view"]["community"]["surf_hours"], json!("40.0 hours"));
        assert_eq!(body["view"]["community"]["total_stoke"], json!("301"));
        let sessions = &body["view"]["leaderboards"]["sessions"];
        assert_eq!(sessions[0]["user_id"], json!("u-2"));
        assert_eq!(sessions[1]["display_name"], json!("You"));
        assert_eq!(sessions[1]["user_id"], json!("user-7"));
    }

    #[rstest]
    #[actix_web::test]
    async fn honours_the_requested_year() {
        let (status, body) = get(Arc::new(direct_only()), "/api/dashboard?year=2024").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"]["year"], json!(2024));
        assert_eq!(body["view"]["you"]["total_sessions"], json!(3));
    }

    #[rstest]
    #[actix_web::test]
    async fn unavailable_without_a_mock() {
        let (status, body) = get(Arc::new(FixtureUpstreamHttp), "/api/dashboard").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], json!(DASHBOARD_FAILURE));
    }
}
