//! Port for the fallback session table used when the external API is down.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by fallback store adapters.
    pub enum FallbackSessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "fallback session store connection failed: {message}",
        /// Insert failed during execution.
        Query { message: String } => "fallback session store query failed: {message}",
    }
}

/// A session row to insert into the fallback table.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackSessionRecord {
    pub session_name: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub end_time: NaiveTime,
    pub fun_rating: f64,
    pub session_notes: Option<String>,
    pub user_id: String,
    pub tagged_users: Vec<String>,
    pub raw_swell: Value,
    pub created_at: DateTime<Utc>,
}

/// A row as stored, with its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredSession {
    pub id: i64,
    pub session_name: String,
    pub location: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "hms")]
    pub time: NaiveTime,
    #[serde(serialize_with = "hms")]
    pub end_time: NaiveTime,
    pub fun_rating: f64,
    pub session_notes: Option<String>,
    pub user_id: String,
    pub tagged_users: Vec<String>,
    pub raw_swell: Value,
    pub created_at: DateTime<Utc>,
}

fn hms<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&time.format("%H:%M:%S").to_string())
}

impl StoredSession {
    pub fn from_record(id: i64, record: &FallbackSessionRecord) -> Self {
        Self {
            id,
            session_name: record.session_name.clone(),
            location: record.location.clone(),
            date: record.date,
            time: record.time,
            end_time: record.end_time,
            fun_rating: record.fun_rating,
            session_notes: record.session_notes.clone(),
            user_id: record.user_id.clone(),
            tagged_users: record.tagged_users.clone(),
            raw_swell: record.raw_swell.clone(),
            created_at: record.created_at,
        }
    }
}

/// Port for writing sessions to the fallback table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FallbackSessionStore: Send + Sync {
    /// Insert a session and return the stored row.
    async fn insert(
        &self,
        record: &FallbackSessionRecord,
    ) -> Result<StoredSession, FallbackSessionStoreError>;
}

/// Process-local store used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryFallbackSessionStore {
    rows: Mutex<Vec<StoredSession>>,
}

impl InMemoryFallbackSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored rows in insertion order.
    pub fn rows(&self) -> Vec<StoredSession> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FallbackSessionStore for InMemoryFallbackSessionStore {
    async fn insert(
        &self,
        record: &FallbackSessionRecord,
    ) -> Result<StoredSession, FallbackSessionStoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| FallbackSessionStoreError::connection("in-memory store poisoned"))?;
        let id = i64::try_from(rows.len())
            .map(|len| len + 1)
            .map_err(|err| FallbackSessionStoreError::query(err.to_string()))?;
        let stored = StoredSession::from_record(id, record);
        rows.push(stored.clone());
        Ok(stored)
    }
}
