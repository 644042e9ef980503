//! Request extractor for the authentication gate.
//!
//! The browser keeps a bearer token and a JSON user record in local storage.
//! Clients send them as `Authorization: Bearer <token>` and `X-User-Data`;
//! handlers that take [`Authenticated`] only run when both are present.

use std::future::{Ready, ready};
use std::ops::Deref;

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use serde_json::json;

use crate::domain::Error;
use crate::domain::auth::{
    AuthContext, AuthDecision, AuthGate, LOGIN_PROMPT_MESSAGE, LOGIN_PROMPT_TITLE,
};

/// Header carrying the serialised user record.
pub const USER_DATA_HEADER: &str = "x-user-data";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = raw.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}

fn user_record(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_DATA_HEADER)?.to_str().ok()
}

/// The error every protected route answers with when the gate is closed.
pub fn login_required() -> Error {
    Error::unauthorized(LOGIN_PROMPT_MESSAGE).with_details(json!({
        "title": LOGIN_PROMPT_TITLE,
        "code": "login_required",
    }))
}

/// Run the gate over request headers.
pub fn authenticate(headers: &HeaderMap) -> Result<AuthContext, Error> {
    match AuthGate::evaluate(bearer_token(headers), user_record(headers)) {
        AuthDecision::Authenticated(ctx) => Ok(ctx),
        AuthDecision::LoginRequired => Err(login_required()),
    }
}

/// An authenticated caller.
#[derive(Debug, Clone)]
pub struct Authenticated(AuthContext);

impl Authenticated {
    pub fn into_inner(self) -> AuthContext {
        self.0
    }
}

impl Deref for Authenticated {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req.headers()).map(Self))
    }
}
