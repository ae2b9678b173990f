//! Domain primitives, use-cases and ports.
//!
//! Purpose: define the customer aggregate, its commands and validation
//! rules, and the ports through which adapters drive or are driven by the
//! domain. Nothing here depends on actix-web.
//!
//! Public surface:
//! - Error / ErrorCode / FieldViolation: transport-agnostic failures.
//! - Customer, CustomerDto, CustomerId and the command types.
//! - RuleSet implementations for each command.
//! - CustomerServiceImpl: the driving port implementation.
//! - TraceId: per-request correlation identifier.

pub mod customer;
mod customer_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod validation;

pub use self::customer::{
    CreateCustomerCommand, Customer, CustomerDto, CustomerId, DeleteCustomerCommand, Location,
    UpdateCustomerCommand,
};
pub use self::customer_service::CustomerServiceImpl;
pub use self::error::{Error, ErrorCode, FieldViolation};
pub use self::trace_id::TraceId;
pub use self::validation::{
    CreateCustomerRules, DeleteCustomerRules, RuleSet, UpdateCustomerRules, Violations,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use customer_api::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
