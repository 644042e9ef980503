//! Typed operations against the external surf API.
//!
//! Each call is a single attempt with the caller's bearer token. Envelope
//! shapes are normalised through [`super::envelope`] and failures are kept
//! apart in [`SurfApiError`] until a handler converts them into a domain
//! [`Error`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};
use url::Url;

use super::Error;
use super::dashboard::DashboardStats;
use super::envelope::{EnvelopeError, decode_sessions, extract_record, extract_records};
use super::forecast::ForecastData;
use super::ports::{HttpMethod, UpstreamHttp, UpstreamHttpError, UpstreamRequest, UpstreamResponse};
use super::sessions::SurfSession;

/// Shortest user search the API is asked to run.
pub const MIN_USER_QUERY_CHARS: usize = 2;

const STATUS_BODY_CHARS: usize = 200;
const NO_SESSIONS_FOUND: &str = "No sessions found";

/// Failures talking to the external API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfApiError {
    /// The API answered with a non-2xx status.
    #[error("API request failed: {status} {body}")]
    Status { status: u16, body: String },
    #[error("the API did not answer in time: {0}")]
    Timeout(String),
    #[error("the API could not be reached: {0}")]
    Transport(String),
    /// The request could not be built.
    #[error("invalid API request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// A 2xx body that could not be read as the expected type.
    #[error("unreadable API response: {0}")]
    Decode(String),
}

impl SurfApiError {
    fn from_status(response: &UpstreamResponse) -> Self {
        let body = response
            .json()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| response.body.chars().take(STATUS_BODY_CHARS).collect());
        Self::Status {
            status: response.status,
            body,
        }
    }
}

impl From<UpstreamHttpError> for SurfApiError {
    fn from(err: UpstreamHttpError) -> Self {
        match err {
            UpstreamHttpError::Timeout { message } => Self::Timeout(message),
            UpstreamHttpError::Transport { message } => Self::Transport(message),
            UpstreamHttpError::InvalidRequest { message } => Self::InvalidRequest(message),
        }
    }
}

impl From<SurfApiError> for Error {
    fn from(err: SurfApiError) -> Self {
        match &err {
            SurfApiError::Status { status, .. } => {
                let message = err.to_string();
                let details = json!({ "status": status });
                match *status {
                    401 => Error::unauthorized(message),
                    403 => Error::forbidden(message),
                    404 => Error::not_found(message),
                    _ => Error::bad_gateway(message),
                }
                .with_details(details)
            }
            SurfApiError::Timeout(_) => Error::gateway_timeout("The request to the API timed out"),
            SurfApiError::Transport(_) => Error::bad_gateway("Failed to fetch from API"),
            SurfApiError::InvalidRequest(message) => Error::internal(message.clone()),
            SurfApiError::Envelope(EnvelopeError::Upstream(message)) => {
                Error::bad_gateway(message.clone())
            }
            SurfApiError::Envelope(EnvelopeError::UnexpectedShape) | SurfApiError::Decode(_) => {
                Error::bad_gateway("Invalid response format from API")
            }
        }
    }
}

/// A spot that sessions can be logged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfSpot {
    pub name: String,
    pub slug: String,
}

/// A user returned by the tagging search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Client for the external API's REST endpoints.
#[derive(Clone)]
pub struct SurfApi {
    http: Arc<dyn UpstreamHttp>,
    base_url: Url,
    timeout: Duration,
}

impl SurfApi {
    pub fn new(http: Arc<dyn UpstreamHttp>, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SurfApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SurfApiError::InvalidRequest(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        token: &str,
        body: Option<Value>,
    ) -> Result<UpstreamResponse, SurfApiError> {
        debug!(%url, %method, "calling surf API");
        let request = UpstreamRequest::json(method, url.clone(), self.timeout)
            .with_bearer(token)
            .with_body(body);
        let response = self.http.send(request).await.map_err(|err| {
            error!(%url, %method, error = %err, "surf API call failed");
            SurfApiError::from(err)
        })?;
        Ok(response)
    }

    async fn send_ok(
        &self,
        method: HttpMethod,
        url: Url,
        token: &str,
        body: Option<Value>,
    ) -> Result<UpstreamResponse, SurfApiError> {
        let response = self.send(method, url, token, body).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(SurfApiError::from_status(&response))
        }
    }

    async fn get_json(&self, url: Url, token: &str) -> Result<Value, SurfApiError> {
        let response = self.send_ok(HttpMethod::Get, url, token, None).await?;
        response
            .json()
            .ok_or_else(|| SurfApiError::Decode("response was not JSON".to_owned()))
    }

    async fn get_record<T>(&self, url: Url, token: &str) -> Result<T, SurfApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let record = extract_record(self.get_json(url, token).await?)?;
        serde_json::from_value(Value::Object(record))
            .map_err(|err| SurfApiError::Decode(err.to_string()))
    }

    async fn get_list<T>(&self, url: Url, token: &str) -> Result<Vec<T>, SurfApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        extract_records(self.get_json(url, token).await?)?
            .into_iter()
            .map(|record| {
                serde_json::from_value(record).map_err(|err| SurfApiError::Decode(err.to_string()))
            })
            .collect()
    }

    pub async fn get_session(&self, token: &str, id: i64) -> Result<SurfSession, SurfApiError> {
        let url = self.endpoint(&["api", "surf-sessions", &id.to_string()])?;
        self.get_record(url, token).await
    }

    /// Sessions logged at `location`. An unknown location is an empty list.
    pub async fn sessions_by_location(
        &self,
        token: &str,
        location: &str,
    ) -> Result<Vec<SurfSession>, SurfApiError> {
        let url = self.endpoint(&["api", "surf-sessions", "location", location])?;
        let response = self.send(HttpMethod::Get, url, token, None).await?;
        if response.status == 404 {
            return Ok(Vec::new());
        }
        let body = response.json();
        let no_sessions = body
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .is_some_and(|message| message.starts_with(NO_SESSIONS_FOUND));
        if no_sessions {
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(SurfApiError::from_status(&response));
        }
        let body = body.ok_or_else(|| SurfApiError::Decode("response was not JSON".to_owned()))?;
        Ok(decode_sessions(extract_records(body)?))
    }

    /// Post a validated session body.
    ///
    /// A 2xx reply without a JSON body still counts as created.
    pub async fn create_session(&self, token: &str, payload: Value) -> Result<Value, SurfApiError> {
        let url = self.endpoint(&["api", "surf-sessions"])?;
        let response = self
            .send_ok(HttpMethod::Post, url, token, Some(payload))
            .await?;
        if response.body.trim().is_empty() {
            return Ok(json!({"message": "Session added successfully (empty response)"}));
        }
        Ok(response
            .json()
            .unwrap_or_else(|| json!({"message": "Session added successfully (non-JSON response)"})))
    }

    /// Apply a partial update and return the API's reply.
    pub async fn update_session(
        &self,
        token: &str,
        id: i64,
        payload: Value,
    ) -> Result<Value, SurfApiError> {
        let url = self.endpoint(&["api", "surf-sessions", &id.to_string()])?;
        let response = self
            .send_ok(HttpMethod::Put, url, token, Some(payload))
            .await?;
        Ok(response
            .json()
            .unwrap_or_else(|| json!({"message": "Session updated successfully"})))
    }

    pub async fn delete_session(&self, token: &str, id: i64) -> Result<(), SurfApiError> {
        let url = self.endpoint(&["api", "surf-sessions", &id.to_string()])?;
        self.send_ok(HttpMethod::Delete, url, token, None).await?;
        Ok(())
    }

    pub async fn dashboard(&self, token: &str) -> Result<DashboardStats, SurfApiError> {
        let url = self.endpoint(&["api", "dashboard"])?;
        self.get_record(url, token).await
    }

    pub async fn forecast(&self, token: &str, location: &str) -> Result<ForecastData, SurfApiError> {
        let url = self.endpoint(&["api", "forecast", location])?;
        self.get_record(url, token).await
    }

    pub async fn surf_spots(&self, token: &str) -> Result<Vec<SurfSpot>, SurfApiError> {
        let url = self.endpoint(&["api", "surf-spots"])?;
        self.get_list(url, token).await
    }

    /// Users matching `query`, minus those already in `exclude`.
    ///
    /// Queries shorter than [`MIN_USER_QUERY_CHARS`] return nothing without
    /// calling the API.
    pub async fn search_users(
        &self,
        token: &str,
        query: &str,
        exclude: &[String],
    ) -> Result<Vec<UserSummary>, SurfApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_USER_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let mut url = self.endpoint(&["api", "users", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        let users: Vec<UserSummary> = self.get_list(url, token).await?;
        Ok(users
            .into_iter()
            .filter(|user| !exclude.contains(&user.user_id))
            .collect())
    }
}

#[cfg(test)]
#[path = "surf_api_tests.rs"]
mod tests;
