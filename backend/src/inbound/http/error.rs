//! Translation of domain errors into RFC 7807 problem responses.
//!
//! Every failure leaving the HTTP adapter is an [`ApiProblem`]: the domain
//! [`Error`] plus the request path it occurred on. Rendering picks the
//! status, title and detail per [`ErrorCode`], attaches the trace id, and
//! redacts internal failures after logging them.

use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use super::endpoint::docs::PROBLEM_CONTENT_TYPE;
use crate::domain::{Error, ErrorCode, FieldViolation, TraceId};
use crate::middleware::TRACE_ID_HEADER;

const PROBLEM_TYPE_BASE: &str = "https://example.com/problem-types/";
const VALIDATION_TITLE: &str = "One or more validation errors occurred";
const VALIDATION_DETAIL: &str =
    "The request contains invalid parameters. More information can be found in the errors.";
const INTERNAL_TITLE: &str = "An unexpected error occurred!";
const INTERNAL_DETAIL: &str = "Something went wrong";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Extension members of a problem body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemExtensions {
    /// Correlation id of the failed request.
    pub trace: Option<String>,
    /// Failed validation rules, present only for validation problems.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

/// RFC 7807 problem body.
///
/// Example JSON:
/// `{"type":"https://example.com/problem-types/not_found","title":"Not Found","status":404,"detail":"Could not find customer with id 00000000-0000-0000-0000-000000000001","instance":"/customers/00000000-0000-0000-0000-000000000001","extensions":{"trace":"9b2f6a52-8a4e-4a3f-9d0c-0b8f2f4d1e11"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    pub extensions: ProblemExtensions,
}

/// A domain error bound to the request path that produced it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct ApiProblem {
    error: Error,
    instance: String,
}

impl ApiProblem {
    /// Bind `error` to `instance`, attaching the current trace id when the
    /// error does not carry one yet.
    pub fn new(error: Error, instance: impl Into<String>) -> Self {
        let error = match (error.trace_id(), TraceId::current()) {
            (None, Some(trace_id)) => error.with_trace_id(trace_id.to_string()),
            _ => error,
        };
        Self {
            error,
            instance: instance.into(),
        }
    }

    #[must_use]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// The body sent to the client.
    #[must_use]
    pub fn details(&self) -> ProblemDetails {
        let code = self.error.code();
        let status = status_for(code);
        let (title, detail) = match code {
            ErrorCode::ValidationFailed => {
                (VALIDATION_TITLE.to_owned(), VALIDATION_DETAIL.to_owned())
            }
            ErrorCode::InternalError => (INTERNAL_TITLE.to_owned(), INTERNAL_DETAIL.to_owned()),
            _ => (
                status.canonical_reason().unwrap_or("Error").to_owned(),
                self.error.message().to_owned(),
            ),
        };

        ProblemDetails {
            problem_type: format!("{PROBLEM_TYPE_BASE}{code}"),
            title,
            status: status.as_u16(),
            detail,
            instance: self.instance.clone(),
            extensions: ProblemExtensions {
                trace: self.error.trace_id().map(str::to_owned),
                errors: self.error.violations().to_vec(),
            },
        }
    }
}

impl ResponseError for ApiProblem {
    fn status_code(&self) -> StatusCode {
        status_for(self.error.code())
    }

    fn error_response(&self) -> HttpResponse {
        match self.error.code() {
            ErrorCode::InternalError => error!(
                instance = %self.instance,
                trace_id = self.error.trace_id(),
                error = %self.error,
                "request failed with an internal error"
            ),
            ErrorCode::ServiceUnavailable => warn!(
                instance = %self.instance,
                trace_id = self.error.trace_id(),
                error = %self.error,
                "request failed; dependency unavailable"
            ),
            _ => {}
        }

        let mut builder = HttpResponse::build(self.status_code());
        builder
            .content_type(PROBLEM_CONTENT_TYPE)
            .insert_header((header::CACHE_CONTROL, "no-cache"));
        if let Some(value) = self
            .error
            .trace_id()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            builder.insert_header((HeaderName::from_static(TRACE_ID_HEADER), value));
        }
        builder.json(self.details())
    }
}

/// Fallback for paths, or verbs on known paths, that no handler serves.
pub async fn unmatched_route(req: HttpRequest) -> Result<HttpResponse, ApiProblem> {
    Err(ApiProblem::new(
        Error::not_found(format!("No endpoint serves {} {}", req.method(), req.path())),
        req.path(),
    ))
}
