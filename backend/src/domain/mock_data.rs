//! Stand-in payloads returned when the external API is unreachable.
//!
//! The shapes match the API's success responses so dependent views can
//! render without a live data source. Dates are relative to `today`.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use serde_json::Value;

use super::sessions::{SurfSession, SwellComponent, SwellComponents, SwellSnapshot};

#[derive(Serialize)]
struct SessionListPayload<'a> {
    status: &'static str,
    data: &'a [SurfSession],
}

struct MockUser {
    id: &'static str,
    email: &'static str,
    display_name: &'static str,
}

struct MockTemplate {
    id: i64,
    location: &'static str,
    days_ago: u64,
    time: &'static str,
    rating: f64,
    notes: &'static str,
    user: MockUser,
}

const LIST: [MockTemplate; 3] = [
    MockTemplate {
        id: 1,
        location: "Mock Beach",
        days_ago: 0,
        time: "10:00:00",
        rating: 8.0,
        notes: "This is a mock session",
        user: MockUser {
            id: "mock-user-id",
            email: "mock-user@example.com",
            display_name: "Mock User 1",
        },
    },
    MockTemplate {
        id: 2,
        location: "Another Beach",
        days_ago: 1,
        time: "14:30:00",
        rating: 7.0,
        notes: "Another mock session",
        user: MockUser {
            id: "different-user-id",
            email: "different-user@example.com",
            display_name: "Mock User 2",
        },
    },
    MockTemplate {
        id: 3,
        location: "Third Beach",
        days_ago: 2,
        time: "08:15:00",
        rating: 9.0,
        notes: "A third mock session",
        user: MockUser {
            id: "third-user-id",
            email: "third-user@example.com",
            display_name: "Mock User 3",
        },
    },
];

impl MockTemplate {
    fn build(&self, today: NaiveDate) -> SurfSession {
        SurfSession {
            id: self.id,
            session_name: format!("Mock Session {}", self.id),
            location: self.location.to_owned(),
            date: Some(
                today
                    .checked_sub_days(Days::new(self.days_ago))
                    .unwrap_or(today),
            ),
            time: Some(self.time.to_owned()),
            end_time: None,
            fun_rating: Some(self.rating),
            session_notes: Some(self.notes.to_owned()),
            user_id: Some(self.user.id.to_owned()),
            display_name: Some(self.user.display_name.to_owned()),
            user_email: Some(self.user.email.to_owned()),
            participants: Vec::new(),
            raw_swell: Vec::new(),
            raw_met: Vec::new(),
            raw_tide: None,
        }
    }
}

/// The fixed three-session list, newest first.
pub fn mock_sessions(today: NaiveDate) -> Vec<SurfSession> {
    LIST.iter().map(|template| template.build(today)).collect()
}

/// A single mock session carrying the requested id.
pub fn mock_session(id: i64, today: NaiveDate) -> SurfSession {
    let template = MockTemplate {
        id,
        location: "Mock Beach",
        days_ago: 0,
        time: "10:00:00",
        rating: 8.0,
        notes: "This is a mock session returned by the proxy when the API is unreachable.",
        user: MockUser {
            id: "mock-user-id",
            email: "mock@example.com",
            display_name: "Mock User",
        },
    };
    let mut session = template.build(today);
    session.raw_swell = vec![SwellSnapshot {
        date: None,
        swell_components: SwellComponents {
            swell_1: Some(SwellComponent {
                height: Some(3.5),
                period: Some(12.0),
                direction: Some(270.0),
            }),
            ..SwellComponents::default()
        },
    }];
    session
}

/// `{status: "success", data: [..]}` wrapping [`mock_sessions`].
pub fn mock_session_list_payload(today: NaiveDate) -> Value {
    let sessions = mock_sessions(today);
    serde_json::to_value(SessionListPayload {
        status: "success",
        data: &sessions,
    })
    .unwrap_or(Value::Null)
}

/// Bare-object payload for [`mock_session`].
pub fn mock_session_payload(id: i64, today: NaiveDate) -> Value {
    serde_json::to_value(mock_session(id, today)).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the mock payloads.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::envelope::{decode_sessions, extract_records};

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).expect("valid date")
    }

    #[rstest]
    fn list_payload_decodes_as_three_sessions(today: NaiveDate) {
        let records = extract_records(mock_session_list_payload(today)).expect("envelope");
        let sessions = decode_sessions(records);
        let dates: Vec<_> = sessions.iter().filter_map(|s| s.date).collect();
        assert_eq!(sessions.len(), 3);
        assert_eq!(
            dates,
            vec![
                today,
                NaiveDate::from_ymd_opt(2025, 7, 13).expect("valid date"),
                NaiveDate::from_ymd_opt(2025, 7, 12).expect("valid date"),
            ]
        );
    }

    #[rstest]
    fn single_mock_session_snapshot(today: NaiveDate) {
        let rendered =
            serde_json::to_string_pretty(&mock_session(42, today)).expect("serialise");
        insta::assert_snapshot!(rendered, @r#"
        {
          "id": 42,
          "session_name": "Mock Session 42",
          "location": "Mock Beach",
          "date": "2025-07-14",
          "time": "10:00:00",
          "end_time": null,
          "fun_rating": 8.0,
          "session_notes": "This is a mock session returned by the proxy when the API is unreachable.",
          "user_id": "mock-user-id",
          "display_name": "Mock User",
          "user_email": "mock@example.com",
          "participants": [],
          "raw_swell": [
            {
              "date": null,
              "swell_components": {
                "swell_1": {
                  "height": 3.5,
                  "period": 12.0,
                  "direction": 270.0
                },
                "swell_2": null,
                "swell_3": null,
                "swell_4": null
              }
            }
          ],
          "raw_met": [],
          "raw_tide": null
        }
        "#);
    }
}
