//! Session creation with a fallback datastore.
//!
//! A validated draft is posted to the external API. When the API cannot take
//! it, the session is written to the `surf_sessions_duplicate` table instead
//! so the user's input is not lost.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use super::Error;
use super::auth::AuthContext;
use super::ports::{FallbackSessionRecord, FallbackSessionStore, FallbackSessionStoreError};
use super::sessions::{SessionDraft, ValidatedSession};
use super::surf_api::SurfApi;

/// Where a submitted session ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionSource {
    Api,
    FallbackStore,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub source: SubmissionSource,
    pub data: Value,
}

/// Placeholder environmental snapshot stored with fallback rows.
pub fn placeholder_raw_swell() -> Value {
    json!({
        "swells": [],
        "conditions": {
            "tide": {"height": 0, "type": "unknown"},
            "wind": {"speed": 0, "direction": 0},
            "temperature": {"water": 0, "air": 0}
        }
    })
}

/// Submits sessions to the API and falls back to the duplicate table.
#[derive(Clone)]
pub struct SessionSubmissionService {
    api: SurfApi,
    store: Arc<dyn FallbackSessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionSubmissionService {
    pub fn new(api: SurfApi, store: Arc<dyn FallbackSessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { api, store, clock }
    }

    fn map_store_error(error: FallbackSessionStoreError) -> Error {
        let reason = match error {
            FallbackSessionStoreError::Connection { message }
            | FallbackSessionStoreError::Query { message } => message,
        };
        Error::service_unavailable("Failed to add session").with_details(json!({
            "reason": reason,
        }))
    }

    fn fallback_record(&self, auth: &AuthContext, session: ValidatedSession) -> FallbackSessionRecord {
        let now = self.clock.utc();
        FallbackSessionRecord {
            session_name: format!("{} ({})", session.session_name, now.timestamp_millis()),
            location: session.location,
            date: session.date,
            time: session.time,
            end_time: session.end_time,
            fun_rating: session.fun_rating,
            session_notes: session.session_notes,
            user_id: auth.user_id().to_owned(),
            tagged_users: session.tagged_users,
            raw_swell: placeholder_raw_swell(),
            created_at: now,
        }
    }

    /// Validate and submit a draft.
    ///
    /// Validation failures never reach the API. API failures of any kind
    /// divert the session to the fallback store.
    pub async fn submit(
        &self,
        auth: &AuthContext,
        draft: &SessionDraft,
    ) -> Result<SubmissionOutcome, Error> {
        let session = draft.validate().map_err(Error::from)?;
        match self
            .api
            .create_session(auth.token(), session.to_api_payload())
            .await
        {
            Ok(data) => {
                info!(user_id = auth.user_id(), "session created through the API");
                Ok(SubmissionOutcome {
                    success: true,
                    source: SubmissionSource::Api,
                    data,
                })
            }
            Err(err) => {
                warn!(
                    user_id = auth.user_id(),
                    error = %err,
                    "session API rejected the submission; using fallback store"
                );
                let record = self.fallback_record(auth, session);
                let stored = self
                    .store
                    .insert(&record)
                    .await
                    .map_err(Self::map_store_error)?;
                let data = serde_json::to_value(&stored)
                    .map_err(|err| Error::internal(format!("failed to serialize session: {err}")))?;
                Ok(SubmissionOutcome {
                    success: true,
                    source: SubmissionSource::FallbackStore,
                    data,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "session_submission_tests.rs"]
mod tests;
