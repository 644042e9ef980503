//! Authentication gate for protected views.
//!
//! A caller is authenticated when it presents both a bearer token and a
//! decodable user record. Tokens are checked for presence only; the external
//! API remains the authority on their validity.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

/// Heading shown in place of protected content.
pub const LOGIN_PROMPT_TITLE: &str = "Welcome to Surf Tracker";

/// Body copy shown in place of protected content.
pub const LOGIN_PROMPT_MESSAGE: &str =
    "Please log in to view your surf sessions or create a new account to get started.";

/// The signed-in user as stored by the client after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "user_id", deserialize_with = "id_text")]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    match Id::deserialize(deserializer)? {
        Id::Text(text) => Ok(text),
        Id::Number(number) => Ok(number.to_string()),
    }
}

/// Credentials of an authenticated caller.
///
/// # Examples
/// ```
/// use surflog::domain::auth::{AuthContext, UserRecord};
///
/// let user = UserRecord {
///     id: "42".to_owned(),
///     display_name: Some("Kai".to_owned()),
///     email: None,
/// };
/// let ctx = AuthContext::new("abc", user);
/// assert_eq!(ctx.bearer(), "Bearer abc");
/// assert_eq!(ctx.user_id(), "42");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    token: Zeroizing<String>,
    user: UserRecord,
}

impl AuthContext {
    pub fn new(token: impl Into<String>, user: UserRecord) -> Self {
        Self {
            token: Zeroizing::new(token.into()),
            user,
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_str())
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Outcome of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Authenticated(AuthContext),
    LoginRequired,
}

/// Presence check over the stored token and user record.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthGate;

impl AuthGate {
    /// Decide whether protected content may render.
    ///
    /// `user_record` is the JSON-serialised [`UserRecord`]. Blank inputs and
    /// an undecodable record both require a login.
    pub fn evaluate(token: Option<&str>, user_record: Option<&str>) -> AuthDecision {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return AuthDecision::LoginRequired;
        };
        let Some(raw) = user_record.map(str::trim).filter(|r| !r.is_empty()) else {
            return AuthDecision::LoginRequired;
        };
        match serde_json::from_str::<UserRecord>(raw) {
            Ok(user) => AuthDecision::Authenticated(AuthContext::new(token, user)),
            Err(err) => {
                debug!(error = %err, "stored user record did not decode");
                AuthDecision::LoginRequired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the authentication gate.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("tok"), Some(r#"{"id": 7, "display_name": "Kai"}"#), Some("7"))]
    #[case(Some("tok"), Some(r#"{"user_id": "abc", "email": "k@example.com"}"#), Some("abc"))]
    #[case(None, Some(r#"{"id": 7}"#), None)]
    #[case(Some("  "), Some(r#"{"id": 7}"#), None)]
    #[case(Some("tok"), None, None)]
    #[case(Some("tok"), Some("not json"), None)]
    #[case(Some("tok"), Some(r#"{"display_name": "no id"}"#), None)]
    fn gate_requires_token_and_user_record(
        #[case] token: Option<&str>,
        #[case] record: Option<&str>,
        #[case] expected_user: Option<&str>,
    ) {
        match (AuthGate::evaluate(token, record), expected_user) {
            (AuthDecision::Authenticated(ctx), Some(id)) => {
                assert_eq!(ctx.user_id(), id);
                assert_eq!(ctx.token(), "tok");
            }
            (AuthDecision::LoginRequired, None) => {}
            (decision, expected) => panic!("unexpected {decision:?} for {expected:?}"),
        }
    }

    #[rstest]
    fn debug_output_redacts_token() {
        let ctx = AuthContext::new(
            "secret-token",
            UserRecord {
                id: "1".to_owned(),
                display_name: None,
                email: None,
            },
        );
        let rendered = format!("{ctx:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
