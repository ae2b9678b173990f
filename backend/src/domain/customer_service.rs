//! Customer domain service.
//!
//! Implements the [`CustomerService`] driving port on top of a
//! [`CustomerRepository`] and a [`LocationLookup`] enrichment hook.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::domain::ports::{
    CustomerRepository, CustomerRepositoryError, CustomerService, LocationLookup,
};
use crate::domain::{
    CreateCustomerCommand, Customer, CustomerDto, CustomerId, DeleteCustomerCommand, Error,
    UpdateCustomerCommand,
};

fn map_repository_error(error: CustomerRepositoryError) -> Error {
    warn!(kind = error.kind(), %error, "customer store call failed");
    match error {
        CustomerRepositoryError::Unavailable { message } => {
            Error::service_unavailable(format!("customer store unavailable: {message}"))
        }
        CustomerRepositoryError::DuplicateId { id } => {
            Error::internal(format!("customer id {id} collided with an existing record"))
        }
    }
}

/// Customer service backed by a record store.
pub struct CustomerServiceImpl<R, L> {
    repository: Arc<R>,
    lookup: Arc<L>,
}

impl<R, L> Clone for CustomerServiceImpl<R, L> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            lookup: Arc::clone(&self.lookup),
        }
    }
}

impl<R, L> CustomerServiceImpl<R, L> {
    /// Create a service over the given store and enrichment hook.
    pub fn new(repository: Arc<R>, lookup: Arc<L>) -> Self {
        Self { repository, lookup }
    }
}

#[async_trait]
impl<R, L> CustomerService for CustomerServiceImpl<R, L>
where
    R: CustomerRepository,
    L: LocationLookup,
{
    #[instrument(name = "customers.get_all", skip_all)]
    async fn get_all(&self) -> Result<Vec<CustomerDto>, Error> {
        let customers = self
            .repository
            .get_all()
            .await
            .map_err(map_repository_error)?;
        Ok(customers.iter().map(CustomerDto::from).collect())
    }

    #[instrument(name = "customers.get_by_id", skip_all, fields(customer_id = %id))]
    async fn get_by_id(&self, id: CustomerId) -> Result<Option<CustomerDto>, Error> {
        let customer = self
            .repository
            .get_by_id(id)
            .await
            .map_err(map_repository_error)?;
        Ok(customer.as_ref().map(CustomerDto::from))
    }

    #[instrument(name = "customers.create", skip_all, fields(customer_id = tracing::field::Empty))]
    async fn create_new_customer(
        &self,
        command: CreateCustomerCommand,
    ) -> Result<CustomerDto, Error> {
        let id = CustomerId::generate();
        tracing::Span::current().record("customer_id", tracing::field::display(id));

        let location = self.lookup.resolve(&command).await?;
        let customer = Customer {
            id,
            name: command.name,
            address: command.address,
            city: command.city,
            region: location.region,
            state: location.state,
            postal_code: command.postal_code,
            country: location.country,
        };

        let stored = self
            .repository
            .create_new(customer)
            .await
            .map_err(map_repository_error)?;
        debug!("customer created");
        Ok(CustomerDto::from(&stored))
    }

    #[instrument(name = "customers.update", skip_all, fields(customer_id = %command.id))]
    async fn update_customer(
        &self,
        command: UpdateCustomerCommand,
    ) -> Result<Option<CustomerDto>, Error> {
        let Some(existing) = self
            .repository
            .get_by_id(command.id)
            .await
            .map_err(map_repository_error)?
        else {
            debug!("update skipped; customer not found");
            return Ok(None);
        };

        let replacement = Customer {
            id: existing.id,
            name: command.name,
            address: command.address,
            city: command.city,
            region: command.region,
            state: existing.state,
            postal_code: command.postal_code,
            country: command.country,
        };

        let updated = self
            .repository
            .update(replacement)
            .await
            .map_err(map_repository_error)?;
        Ok(updated.as_ref().map(CustomerDto::from))
    }

    #[instrument(
        name = "customers.delete",
        skip_all,
        fields(customer_id = %command.customer_id)
    )]
    async fn delete_customer(
        &self,
        command: DeleteCustomerCommand,
    ) -> Result<Option<CustomerDto>, Error> {
        let Some(snapshot) = self.get_by_id(command.customer_id).await? else {
            debug!("delete skipped; customer not found");
            return Ok(None);
        };

        let removed = self
            .repository
            .delete_by_id(command.customer_id)
            .await
            .map_err(map_repository_error)?;
        Ok(removed.map(|_| snapshot))
    }
}

#[cfg(test)]
#[path = "customer_service_tests.rs"]
mod tests;
