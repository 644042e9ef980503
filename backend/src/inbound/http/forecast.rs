//! Forecast HTTP handler.
//!
//! ```text
//! GET /api/forecast/{location}?day=0
//! ```

use actix_web::{get, web};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::forecast::{ForecastData, ForecastEntry, ForecastKind};
use crate::domain::format::capitalize_location;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Furthest day ahead the navigator can step to.
pub const MAX_DAYS_AHEAD: u8 = 6;

/// Path parameters naming the spot.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastPath {
    /// Spot slug as used by the API.
    pub location: String,
}

/// Day navigator position.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForecastParams {
    /// Days after today, 0 to 6.
    #[serde(default)]
    pub day: u8,
}

/// One forecast hour with its swell bearings bucketed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastHour {
    #[schema(value_type = Object)]
    pub entry: ForecastEntry,
    /// Sixteen-point label per swell component, in feed order.
    pub swell_directions: Vec<Option<String>>,
}

impl From<&ForecastEntry> for ForecastHour {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            swell_directions: entry
                .swell_components
                .iter()
                .map(|swell| swell.compass_label().map(str::to_owned))
                .collect(),
            entry: entry.clone(),
        }
    }
}

/// Response payload for one day of a spot's forecast.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub location: String,
    pub timezone: Option<String>,
    pub generated_at: Option<String>,
    /// Calendar days present in the feed.
    #[schema(value_type = Vec<String>)]
    pub days: Vec<NaiveDate>,
    #[schema(value_type = String, format = "date")]
    pub selected_day: NaiveDate,
    pub day_index: u8,
    /// Observed hours on the selected day.
    pub actual: Vec<ForecastHour>,
    /// Predicted hours on the selected day.
    pub forecast: Vec<ForecastHour>,
}

fn build_response(
    location: &str,
    data: &ForecastData,
    selected_day: NaiveDate,
    day_index: u8,
) -> ForecastResponse {
    let (actual, predicted): (Vec<&ForecastEntry>, Vec<&ForecastEntry>) = data
        .entries_for_day(selected_day)
        .into_iter()
        .partition(|entry| entry.kind == ForecastKind::Actual);
    ForecastResponse {
        location: capitalize_location(location),
        timezone: data.timezone.clone(),
        generated_at: data.forecast_generated_at.clone(),
        days: data.days(),
        selected_day,
        day_index,
        actual: actual.into_iter().map(ForecastHour::from).collect(),
        forecast: predicted.into_iter().map(ForecastHour::from).collect(),
    }
}

/// Hourly forecast for a spot on one day.
#[utoipa::path(
    get,
    path = "/api/forecast/{location}",
    params(ForecastPath, ForecastParams),
    responses(
        (status = 200, description = "Forecast for the selected day", body = ForecastResponse),
        (status = 400, description = "Day out of range", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 502, description = "API failure", body = ErrorSchema),
        (status = 504, description = "API timed out", body = ErrorSchema)
    ),
    tags = ["forecast"],
    operation_id = "getForecast",
    security(("BearerToken" = []))
)]
#[get("/api/forecast/{location}")]
pub async fn forecast(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<ForecastPath>,
    params: web::Query<ForecastParams>,
) -> ApiResult<web::Json<ForecastResponse>> {
    let day_index = params.day;
    if day_index > MAX_DAYS_AHEAD {
        return Err(
            Error::invalid_request(format!("day must be between 0 and {MAX_DAYS_AHEAD}"))
                .with_details(json!({"field": "day", "code": "invalid_query"})),
        );
    }
    let today = state.clock.utc().date_naive();
    let selected_day = today
        .checked_add_days(Days::new(u64::from(day_index)))
        .ok_or_else(|| Error::invalid_request("day is out of range"))?;
    let data = state.api.forecast(auth.token(), &path.location).await?;
    Ok(web::Json(build_response(
        &path.location,
        &data,
        selected_day,
        day_index,
    )))
}
