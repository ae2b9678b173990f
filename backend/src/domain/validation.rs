//! Validation rule sets for customer commands.
//!
//! A [`RuleSet`] checks one command type. Callers choose between two
//! evaluation paths:
//!
//! - [`RuleSet::check`] accumulates every failed rule so it can be merged
//!   with other checks before the request is rejected.
//! - [`RuleSet::ensure_valid`] rejects as soon as the rule set reports
//!   anything, without giving the caller a chance to add violations.
//!
//! Cross-reference rules such as "the customer exists" need the service and
//! therefore live with the handlers, not here.

use super::{
    CreateCustomerCommand, CustomerId, DeleteCustomerCommand, Error, FieldViolation,
    UpdateCustomerCommand,
};

/// Ordered accumulator of failed rules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Start with no violations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed rule.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Record a violation when `value` is empty or whitespace.
    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{field} must not be empty"));
        }
    }

    /// Record a violation when `id` is the nil UUID.
    pub fn require_id(&mut self, field: &str, id: CustomerId) {
        if id.is_nil() {
            self.push(field, format!("{field} must not be the nil UUID"));
        }
    }

    /// Append violations collected elsewhere, keeping their order.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FieldViolation] {
        self.0.as_slice()
    }

    /// `Ok` when nothing failed, otherwise a validation [`Error`] carrying
    /// every violation.
    pub fn into_result(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self.0))
        }
    }
}

/// Rule set bound to one command type.
pub trait RuleSet {
    type Target;

    /// Evaluate every rule and return the failures in declaration order.
    fn check(&self, target: &Self::Target) -> Violations;

    /// Reject immediately when any rule fails.
    fn ensure_valid(&self, target: &Self::Target) -> Result<(), Error> {
        self.check(target).into_result()
    }
}

fn require_address_fields(
    violations: &mut Violations,
    name: &str,
    address: &str,
    city: &str,
    postal_code: &str,
) {
    violations.require_non_empty("name", name);
    violations.require_non_empty("address", address);
    violations.require_non_empty("city", city);
    violations.require_non_empty("postalCode", postal_code);
}

/// Rules for [`CreateCustomerCommand`].
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateCustomerRules;

impl RuleSet for CreateCustomerRules {
    type Target = CreateCustomerCommand;

    fn check(&self, target: &Self::Target) -> Violations {
        let mut violations = Violations::new();
        require_address_fields(
            &mut violations,
            &target.name,
            &target.address,
            &target.city,
            &target.postal_code,
        );
        violations
    }
}

/// Rules for [`UpdateCustomerCommand`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateCustomerRules;

impl RuleSet for UpdateCustomerRules {
    type Target = UpdateCustomerCommand;

    fn check(&self, target: &Self::Target) -> Violations {
        let mut violations = Violations::new();
        violations.require_id("id", target.id);
        require_address_fields(
            &mut violations,
            &target.name,
            &target.address,
            &target.city,
            &target.postal_code,
        );
        violations
    }
}

/// Rules for [`DeleteCustomerCommand`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteCustomerRules;

impl RuleSet for DeleteCustomerRules {
    type Target = DeleteCustomerCommand;

    fn check(&self, target: &Self::Target) -> Violations {
        let mut violations = Violations::new();
        violations.require_id("customerId", target.customer_id);
        violations
    }
}
