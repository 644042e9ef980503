//! Normalisation of the external API's response envelopes.
//!
//! The API wraps list payloads as `{status: "success", data: [..]}`,
//! `{data: [..]}` or not at all. Single records arrive as `{data: {..}}` or a
//! bare object. Failures are reported as `{status: "error", message}`.

use serde_json::{Map, Value};
use tracing::warn;

use super::sessions::SurfSession;

/// Reasons an envelope could not be unwrapped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The API reported an error in-band.
    #[error("upstream reported an error: {0}")]
    Upstream(String),
    /// The payload matched none of the known envelope shapes.
    #[error("unexpected response shape")]
    UnexpectedShape,
}

/// Unwrap a list payload.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use surflog::domain::envelope::extract_records;
///
/// let wrapped = json!({"status": "success", "data": [{"id": 1}]});
/// assert_eq!(extract_records(wrapped).expect("records").len(), 1);
/// assert_eq!(extract_records(json!([])).expect("records").len(), 0);
/// ```
pub fn extract_records(value: Value) -> Result<Vec<Value>, EnvelopeError> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut object) => {
            reject_error_status(&object)?;
            match object.remove("data") {
                Some(Value::Array(records)) => Ok(records),
                _ => Err(EnvelopeError::UnexpectedShape),
            }
        }
        _ => Err(EnvelopeError::UnexpectedShape),
    }
}

/// Unwrap a single-record payload.
pub fn extract_record(value: Value) -> Result<Map<String, Value>, EnvelopeError> {
    let Value::Object(mut object) = value else {
        return Err(EnvelopeError::UnexpectedShape);
    };
    reject_error_status(&object)?;
    match object.remove("data") {
        Some(Value::Object(record)) => Ok(record),
        Some(_) => Err(EnvelopeError::UnexpectedShape),
        None => Ok(object),
    }
}

fn reject_error_status(object: &Map<String, Value>) -> Result<(), EnvelopeError> {
    if object.get("status").and_then(Value::as_str) != Some("error") {
        return Ok(());
    }
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_owned();
    Err(EnvelopeError::Upstream(message))
}

/// Decode session records, skipping any that fail to decode.
pub fn decode_sessions(records: Vec<Value>) -> Vec<SurfSession> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            serde_json::from_value(record)
                .inspect_err(|err| warn!(index, error = %err, "skipping undecodable session"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for envelope unwrapping.

    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!({"status": "success", "data": [{"id": 1}, {"id": 2}]}))]
    #[case(json!({"data": [{"id": 1}, {"id": 2}]}))]
    #[case(json!([{"id": 1}, {"id": 2}]))]
    fn accepts_all_list_shapes(#[case] payload: Value) {
        let records = extract_records(payload).expect("records");
        assert_eq!(records.len(), 2);
    }

    #[rstest]
    fn surfaces_in_band_errors() {
        let err = extract_records(json!({"status": "error", "message": "token expired"}))
            .expect_err("error envelope");
        assert_eq!(err, EnvelopeError::Upstream("token expired".to_owned()));
    }

    #[rstest]
    #[case(json!({"data": {"id": 1}}))]
    #[case(json!({"sessions": []}))]
    #[case(json!("nope"))]
    #[case(Value::Null)]
    fn rejects_unknown_list_shapes(#[case] payload: Value) {
        assert_eq!(extract_records(payload), Err(EnvelopeError::UnexpectedShape));
    }

    #[rstest]
    #[case(json!({"status": "success", "data": {"id": 5}}))]
    #[case(json!({"id": 5}))]
    fn unwraps_single_records(#[case] payload: Value) {
        let record = extract_record(payload).expect("record");
        assert_eq!(record.get("id"), Some(&json!(5)));
    }

    #[rstest]
    fn skips_records_that_fail_to_decode() {
        let sessions = decode_sessions(vec![
            json!({"id": 1, "session_name": "ok"}),
            json!({"session_name": "no id"}),
            json!({"id": 3}),
        ]);
        let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
