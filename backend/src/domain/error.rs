//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to
//! problem-details responses; nothing in the domain knows about status codes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// One or more validation rules failed; see the attached violations.
    ValidationFailed,
    /// The request could not be bound to the handler inputs.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// A dependency is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Snake-case identifier matching the serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::InvalidRequest => "invalid_request",
            Self::NotFound => "not_found",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed rule, reported against the offending field.
///
/// # Examples
/// ```
/// use customer_api::domain::FieldViolation;
///
/// let violation = FieldViolation::new("name", "name must not be empty");
/// assert_eq!(violation.field(), "name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    #[schema(example = "postalCode")]
    field: String,
    #[schema(example = "postalCode must not be empty")]
    message: String,
}

impl FieldViolation {
    /// Build a violation for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the field the rule applies to, as it appears on the wire.
    #[must_use]
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Human-readable explanation of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Domain error payload.
///
/// Validation failures carry the full list of violations collected before
/// the operation was rejected; every other category carries an empty list.
///
/// # Examples
/// ```
/// use customer_api::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.violations().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    violations: Vec<FieldViolation>,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error with the given category and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
            trace_id: None,
        }
    }

    /// Validation failure carrying every collected violation.
    #[must_use]
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self {
            violations,
            ..Self::new(
                ErrorCode::ValidationFailed,
                "One or more validation errors occurred",
            )
        }
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attach the correlation identifier of the request that failed.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Violations collected by validation; empty for other categories.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        self.violations.as_slice()
    }

    /// Correlation identifier, when one was attached.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}
