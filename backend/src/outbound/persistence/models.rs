//! Internal Diesel row structs for the fallback session table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::surf_sessions_duplicate;
use crate::domain::ports::{FallbackSessionRecord, StoredSession};

/// Row struct for reading back an inserted session.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = surf_sessions_duplicate)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SurfSessionRow {
    pub id: i64,
    pub session_name: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub end_time: NaiveTime,
    pub fun_rating: f64,
    pub session_notes: Option<String>,
    pub user_id: String,
    pub tagged_users: Vec<String>,
    pub raw_swell: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<SurfSessionRow> for StoredSession {
    fn from(row: SurfSessionRow) -> Self {
        Self {
            id: row.id,
            session_name: row.session_name,
            location: row.location,
            date: row.date,
            time: row.time,
            end_time: row.end_time,
            fun_rating: row.fun_rating,
            session_notes: row.session_notes,
            user_id: row.user_id,
            tagged_users: row.tagged_users,
            raw_swell: row.raw_swell,
            created_at: row.created_at,
        }
    }
}

/// Insertable struct borrowing from a domain record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = surf_sessions_duplicate)]
pub(crate) struct NewSurfSessionRow<'a> {
    pub session_name: &'a str,
    pub location: &'a str,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub end_time: NaiveTime,
    pub fun_rating: f64,
    pub session_notes: Option<&'a str>,
    pub user_id: &'a str,
    pub tagged_users: &'a [String],
    pub raw_swell: &'a serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a FallbackSessionRecord> for NewSurfSessionRow<'a> {
    fn from(record: &'a FallbackSessionRecord) -> Self {
        Self {
            session_name: &record.session_name,
            location: &record.location,
            date: record.date,
            time: record.time,
            end_time: record.end_time,
            fun_rating: record.fun_rating,
            session_notes: record.session_notes.as_deref(),
            user_id: &record.user_id,
            tagged_users: &record.tagged_users,
            raw_swell: &record.raw_swell,
            created_at: record.created_at,
        }
    }
}
