//! Session form input and its validation.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::Error;
use crate::domain::format::parse_time_of_day;

/// Raw session form input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionDraft {
    #[serde(default)]
    pub session_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub fun_rating: Option<f64>,
    #[serde(default)]
    pub session_notes: Option<String>,
    #[serde(default)]
    pub tagged_users: Vec<String>,
}

/// Reasons a session draft is rejected before submission.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionDraftError {
    #[error("Please fill in all required fields")]
    MissingField { field: &'static str },
    #[error("Fun rating must be between 1 and 10")]
    RatingOutOfRange { value: f64 },
    #[error("{field} must be a time of day (HH:MM or HH:MM:SS)")]
    InvalidTime { field: &'static str, value: String },
    #[error("date must be a calendar date (YYYY-MM-DD)")]
    InvalidDate { value: String },
    #[error("End time must not be before start time")]
    EndBeforeStart,
}

impl SessionDraftError {
    /// Form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidTime { field, .. } => field,
            Self::RatingOutOfRange { .. } => "fun_rating",
            Self::InvalidDate { .. } => "date",
            Self::EndBeforeStart => "end_time",
        }
    }
}

impl From<SessionDraftError> for Error {
    fn from(err: SessionDraftError) -> Self {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": err.field(),
            "code": "invalid_session",
        }))
    }
}

/// A draft that passed validation, with normalised values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSession {
    pub session_name: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub end_time: NaiveTime,
    pub fun_rating: f64,
    pub session_notes: Option<String>,
    pub tagged_users: Vec<String>,
}

impl SessionDraft {
    /// Validate required fields, the rating range and time ordering.
    ///
    /// # Examples
    /// ```
    /// use surflog::domain::sessions::SessionDraft;
    ///
    /// let draft = SessionDraft {
    ///     session_name: "Dawn patrol".into(),
    ///     location: "lido".into(),
    ///     date: "2025-07-14".into(),
    ///     time: "06:00".into(),
    ///     end_time: "07:30".into(),
    ///     fun_rating: Some(8.0),
    ///     ..SessionDraft::default()
    /// };
    /// let valid = draft.validate().expect("valid draft");
    /// assert_eq!(valid.to_api_payload()["time"], "06:00:00");
    /// ```
    pub fn validate(&self) -> Result<ValidatedSession, SessionDraftError> {
        let session_name = required("session_name", &self.session_name)?;
        let location = required("location", &self.location)?;
        let raw_date = required("date", &self.date)?;
        let raw_time = required("time", &self.time)?;
        let raw_end = required("end_time", &self.end_time)?;
        let fun_rating = self
            .fun_rating
            .ok_or(SessionDraftError::MissingField { field: "fun_rating" })?;

        if !(1.0..=10.0).contains(&fun_rating) {
            return Err(SessionDraftError::RatingOutOfRange { value: fun_rating });
        }

        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            SessionDraftError::InvalidDate {
                value: raw_date.to_owned(),
            }
        })?;
        let time = time_field("time", raw_time)?;
        let end_time = time_field("end_time", raw_end)?;
        if end_time < time {
            return Err(SessionDraftError::EndBeforeStart);
        }

        Ok(ValidatedSession {
            session_name: session_name.to_owned(),
            location: location.to_owned(),
            date,
            time,
            end_time,
            fun_rating,
            session_notes: self
                .session_notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_owned),
            tagged_users: self
                .tagged_users
                .iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect(),
        })
    }
}

impl ValidatedSession {
    /// Body posted to the external API's session endpoint.
    pub fn to_api_payload(&self) -> Value {
        let mut payload = json!({
            "session_name": self.session_name,
            "location": self.location,
            "date": self.date.format("%Y-%m-%d").to_string(),
            "time": self.time.format("%H:%M:%S").to_string(),
            "end_time": self.end_time.format("%H:%M:%S").to_string(),
            "fun_rating": self.fun_rating,
        });
        if let Some(map) = payload.as_object_mut() {
            if let Some(notes) = &self.session_notes {
                map.insert("session_notes".to_owned(), Value::from(notes.as_str()));
            }
            if !self.tagged_users.is_empty() {
                map.insert("tagged_users".to_owned(), json!(self.tagged_users));
            }
        }
        payload
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, SessionDraftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SessionDraftError::MissingField { field })
    } else {
        Ok(trimmed)
    }
}

fn time_field(field: &'static str, value: &str) -> Result<NaiveTime, SessionDraftError> {
    parse_time_of_day(value).ok_or_else(|| SessionDraftError::InvalidTime {
        field,
        value: value.to_owned(),
    })
}

/// Partial edit of a stored session. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionUpdate {
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub fun_rating: Option<f64>,
    #[serde(default)]
    pub session_notes: Option<String>,
}

impl SessionUpdate {
    /// Validate the supplied fields and build the API body.
    ///
    /// Only fields present in the update appear in the payload. Blank
    /// required fields are rejected rather than cleared.
    pub fn to_api_payload(&self) -> Result<Value, SessionDraftError> {
        let mut payload = serde_json::Map::new();
        if let Some(name) = &self.session_name {
            let name = required("session_name", name)?;
            payload.insert("session_name".to_owned(), Value::from(name));
        }
        if let Some(raw) = &self.date {
            let raw = required("date", raw)?;
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                SessionDraftError::InvalidDate {
                    value: raw.to_owned(),
                }
            })?;
            payload.insert(
                "date".to_owned(),
                Value::from(date.format("%Y-%m-%d").to_string()),
            );
        }
        let time = self
            .time
            .as_deref()
            .map(|raw| time_field("time", raw))
            .transpose()?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|raw| time_field("end_time", raw))
            .transpose()?;
        if let (Some(start), Some(end)) = (time, end_time) {
            if end < start {
                return Err(SessionDraftError::EndBeforeStart);
            }
        }
        for (key, value) in [("time", time), ("end_time", end_time)] {
            if let Some(value) = value {
                payload.insert(
                    key.to_owned(),
                    Value::from(value.format("%H:%M:%S").to_string()),
                );
            }
        }
        if let Some(rating) = self.fun_rating {
            if !(1.0..=10.0).contains(&rating) {
                return Err(SessionDraftError::RatingOutOfRange { value: rating });
            }
            payload.insert("fun_rating".to_owned(), json!(rating));
        }
        if let Some(notes) = &self.session_notes {
            payload.insert("session_notes".to_owned(), Value::from(notes.trim()));
        }
        Ok(Value::Object(payload))
    }
}
