//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers below mirror their shape and register them under the domain
//! type's path so the generated document names the real types.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No token or user record was supplied.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    /// Every data source for the request is unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// The external API answered with a failure.
    #[schema(rename = "bad_gateway")]
    BadGateway,
    /// The external API did not answer in time.
    #[schema(rename = "gateway_timeout")]
    GatewayTimeout,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "Please fill in all required fields")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::proxy::ProxyRequest`].
///
/// Describes the real request the proxy forwards.
#[derive(ToSchema)]
#[schema(as = crate::domain::proxy::ProxyRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProxyRequestSchema {
    /// Absolute URL, or a path joined onto the API base.
    #[schema(example = "/api/surf-sessions")]
    url: String,
    /// Defaults to GET on the CORS proxy and POST on the plain proxy.
    #[schema(example = "GET")]
    method: Option<String>,
    /// Extra headers; these replace the JSON defaults.
    headers: Option<std::collections::BTreeMap<String, String>>,
    /// JSON body, dropped for GET and HEAD.
    data: Option<serde_json::Value>,
    /// Bearer token forwarded as `Authorization`.
    auth_token: Option<String>,
}

/// OpenAPI schema for [`crate::domain::auth_proxy::AuthProxyRequest`].
#[derive(ToSchema)]
#[schema(as = crate::domain::auth_proxy::AuthProxyRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AuthProxyRequestSchema {
    /// `login` or `signup`.
    #[schema(example = "login")]
    endpoint: String,
    #[schema(example = "kai@example.com")]
    email: String,
    #[schema(format = Password)]
    password: String,
}

/// OpenAPI schema for [`crate::domain::sessions::SessionDraft`].
#[derive(ToSchema)]
#[schema(as = crate::domain::sessions::SessionDraft)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SessionDraftSchema {
    #[schema(example = "Dawn patrol")]
    session_name: String,
    #[schema(example = "lido")]
    location: String,
    #[schema(format = Date, example = "2025-07-14")]
    date: String,
    /// `HH:MM` or `HH:MM:SS`.
    #[schema(example = "06:00")]
    time: String,
    #[schema(example = "07:30")]
    end_time: String,
    /// 1 to 10.
    #[schema(example = 8)]
    fun_rating: f64,
    session_notes: Option<String>,
    /// Ids of co-surfers to tag.
    tagged_users: Option<Vec<String>>,
}

/// OpenAPI schema for [`crate::domain::sessions::SessionUpdate`].
///
/// Absent fields are left unchanged.
#[derive(ToSchema)]
#[schema(as = crate::domain::sessions::SessionUpdate)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SessionUpdateSchema {
    session_name: Option<String>,
    #[schema(format = Date)]
    date: Option<String>,
    time: Option<String>,
    end_time: Option<String>,
    fun_rating: Option<f64>,
    session_notes: Option<String>,
}

/// OpenAPI schema for [`crate::domain::session_submission::SubmissionOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::session_submission::SubmissionOutcome)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmissionOutcomeSchema {
    success: bool,
    /// `api` or `fallback_store`.
    #[schema(example = "api")]
    source: String,
    /// The API reply or the stored fallback row.
    data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    #[case(ErrorCodeSchema::name(), "crate.domain.ErrorCode")]
    #[case(ErrorSchema::name(), "crate.domain.Error")]
    #[case(ProxyRequestSchema::name(), "crate.domain.proxy.ProxyRequest")]
    #[case(SessionDraftSchema::name(), "crate.domain.sessions.SessionDraft")]
    #[case(
        SubmissionOutcomeSchema::name(),
        "crate.domain.session_submission.SubmissionOutcome"
    )]
    fn schemas_are_named_after_domain_types(
        #[case] name: std::borrow::Cow<'static, str>,
        #[case] expected: &str,
    ) {
        // utoipa replaces :: with . in schema names
        assert_eq!(name, expected);
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "bad_gateway",
            "gateway_timeout",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn proxy_schema_documents_the_envelope() {
        let schema_json = schema_to_json::<ProxyRequestSchema>();
        for field in ["url", "method", "headers", "data", "auth_token"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
