//! Lookup handlers used by the session form.
//!
//! ```text
//! GET /api/surf-spots
//! GET /api/users/search?q=kai&exclude=u-1,u-2
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::surf_api::{SurfSpot, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Spot offered by the location picker.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SurfSpotBody {
    #[schema(example = "Lido Beach")]
    pub name: String,
    #[schema(example = "lido-beach")]
    pub slug: String,
}

impl From<SurfSpot> for SurfSpotBody {
    fn from(value: SurfSpot) -> Self {
        Self {
            name: value.name,
            slug: value.slug,
        }
    }
}

/// Response payload for the spot list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SurfSpotsResponse {
    pub spots: Vec<SurfSpotBody>,
}

/// Query parameters for the tagging search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchParams {
    /// Search text; fewer than two characters returns nothing.
    #[serde(default)]
    pub q: String,
    /// Comma-separated ids already tagged on the session.
    #[serde(default)]
    pub exclude: Option<String>,
}

impl UserSearchParams {
    fn excluded_ids(&self) -> Vec<String> {
        self.exclude
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// A user who can be tagged on a session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummaryBody {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl From<UserSummary> for UserSummaryBody {
    fn from(value: UserSummary) -> Self {
        Self {
            user_id: value.user_id,
            display_name: value.display_name,
            email: value.email,
        }
    }
}

/// Response payload for the tagging search.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSearchResponse {
    pub users: Vec<UserSummaryBody>,
}

/// List the spots sessions can be logged against.
#[utoipa::path(
    get,
    path = "/api/surf-spots",
    responses(
        (status = 200, description = "Known spots", body = SurfSpotsResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 502, description = "API failure", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "listSurfSpots",
    security(("BearerToken" = []))
)]
#[get("/api/surf-spots")]
pub async fn surf_spots(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<SurfSpotsResponse>> {
    let spots = state.api.surf_spots(auth.token()).await?;
    Ok(web::Json(SurfSpotsResponse {
        spots: spots.into_iter().map(SurfSpotBody::from).collect(),
    }))
}

/// Find users to tag on a session.
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(UserSearchParams),
    responses(
        (status = 200, description = "Matching users", body = UserSearchResponse),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 502, description = "API failure", body = ErrorSchema)
    ),
    tags = ["directory"],
    operation_id = "searchUsers",
    security(("BearerToken" = []))
)]
#[get("/api/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    auth: Authenticated,
    params: web::Query<UserSearchParams>,
) -> ApiResult<web::Json<UserSearchResponse>> {
    let exclude = params.excluded_ids();
    let users = state
        .api
        .search_users(auth.token(), &params.q, &exclude)
        .await?;
    Ok(web::Json(UserSearchResponse {
        users: users.into_iter().map(UserSummaryBody::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    //! Handler coverage for the lookup routes.

    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{InMemoryFallbackSessionStore, MockUpstreamHttp, UpstreamResponse};
    use crate::inbound::http::test_utils::{authed, test_state};

    async fn get(http: MockUpstreamHttp, uri: &str) -> (StatusCode, Value) {
        let state = test_state(Arc::new(http), Arc::new(InMemoryFallbackSessionStore::new()));
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(surf_spots)
                .service(search_users),
        )
        .await;
        let response =
            actix_test::call_service(&app, authed(actix_test::TestRequest::get().uri(uri)).to_request())
                .await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    fn reply(body: &str) -> UpstreamResponse {
        UpstreamResponse {
            status: 200,
            content_type: Some("application/json".to_owned()),
            body: body.to_owned(),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn spots_are_listed() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .withf(|req| req.url.path() == "/api/surf-spots")
            .times(1)
            .returning(|_| Ok(reply(r#"[{"name":"Lido Beach","slug":"lido-beach"}]"#)));
        let (status, body) = get(http, "/api/surf-spots").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"spots": [{"name": "Lido Beach", "slug": "lido-beach"}]}));
    }

    #[rstest]
    #[actix_web::test]
    async fn search_drops_already_tagged_users() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send()
            .withf(|req| req.url.query() == Some("q=ka"))
            .times(1)
            .returning(|_| {
                Ok(reply(
                    r#"{"data":[{"user_id":"u-1","display_name":"Kai"},{"user_id":"u-3","display_name":"Kala"}]}"#,
                ))
            });
        let (status, body) = get(http, "/api/users/search?q=ka&exclude=u-1,%20u-2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"users": [{"user_id": "u-3", "display_name": "Kala", "email": null}]})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn short_queries_return_nothing() {
        let mut http = MockUpstreamHttp::new();
        http.expect_send().never();
        let (status, body) = get(http, "/api/users/search?q=k").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"users": []}));
    }
}
