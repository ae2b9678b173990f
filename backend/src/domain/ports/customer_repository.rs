//! Driven port for customer record storage.
//!
//! The store owns [`Customer`] records. Lookups are by id only and reads
//! return clones, so callers never hold references into the store.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by customer stores.
    pub enum CustomerRepositoryError {
        /// A record with the same id already exists.
        DuplicateId { id: CustomerId } =>
            "a customer with id {id} already exists",
        /// The store cannot serve requests.
        Unavailable { message: String } =>
            "customer store unavailable: {message}",
    }
}

/// Keyed collection of customer records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every record, in insertion order.
    async fn get_all(&self) -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// The record with `id`, if present.
    async fn get_by_id(&self, id: CustomerId)
    -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Insert `customer`. Rejects ids that are already stored.
    async fn create_new(&self, customer: Customer) -> Result<Customer, CustomerRepositoryError>;

    /// Replace the record with the same id.
    ///
    /// Returns `None` and leaves the store untouched when the id is unknown.
    async fn update(&self, customer: Customer)
    -> Result<Option<Customer>, CustomerRepositoryError>;

    /// Remove the record with `id`, returning it when it existed.
    async fn delete_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError>;
}
