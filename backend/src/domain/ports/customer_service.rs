//! Driving port for customer use-cases.
//!
//! HTTP handlers depend on this trait rather than on the store, so they can
//! be exercised against a mock without any persistence wiring.

use async_trait::async_trait;

use crate::domain::{
    CreateCustomerCommand, CustomerDto, CustomerId, DeleteCustomerCommand, Error,
    UpdateCustomerCommand,
};

/// Business operations over customers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Projection of every stored customer.
    async fn get_all(&self) -> Result<Vec<CustomerDto>, Error>;

    /// Projection of one customer, if present.
    async fn get_by_id(&self, id: CustomerId) -> Result<Option<CustomerDto>, Error>;

    /// Create a customer under a fresh id, enriching its location fields.
    async fn create_new_customer(&self, command: CreateCustomerCommand)
    -> Result<CustomerDto, Error>;

    /// Replace an existing customer's mutable fields.
    ///
    /// Returns `None` when no customer has the command's id.
    async fn update_customer(
        &self,
        command: UpdateCustomerCommand,
    ) -> Result<Option<CustomerDto>, Error>;

    /// Remove a customer, returning its last projection when it existed.
    async fn delete_customer(
        &self,
        command: DeleteCustomerCommand,
    ) -> Result<Option<CustomerDto>, Error>;
}
