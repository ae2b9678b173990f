//! In-memory customer store.
//!
//! Records live in a `Vec` behind a single mutex, so iteration order is
//! insertion order. The lock is never held across an `.await`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;
use uuid::uuid;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerId};

/// Customer store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    records: Mutex<Vec<Customer>>,
}

impl InMemoryCustomerRepository {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demonstration customers.
    #[must_use]
    pub fn with_fixtures() -> Self {
        Self {
            records: Mutex::new(fixture_customers()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Customer>>, CustomerRepositoryError> {
        self.records.lock().map_err(|_| {
            warn!("customer store lock poisoned");
            CustomerRepositoryError::unavailable("customer store lock poisoned")
        })
    }
}

fn fixture_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: CustomerId::from_uuid(uuid!("47584949-15b0-4270-9b3e-3cb697af3561")),
            name: "IBM".to_owned(),
            address: "120 W. Big Blue St.".to_owned(),
            city: "Armonk".to_owned(),
            region: "NorthEast".to_owned(),
            state: "NY".to_owned(),
            postal_code: "093832".to_owned(),
            country: "USA".to_owned(),
        },
        Customer {
            id: CustomerId::from_uuid(uuid!("5bc4942a-a832-4894-b232-82a54ea495ec")),
            name: "Microsoft".to_owned(),
            address: "1 Microsoft Way".to_owned(),
            city: "Bellevue".to_owned(),
            region: "NorthWest".to_owned(),
            state: "WA".to_owned(),
            postal_code: "843822".to_owned(),
            country: "USA".to_owned(),
        },
    ]
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_all(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        Ok(self.lock()?.clone())
    }

    async fn get_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(self.lock()?.iter().find(|c| c.id == id).cloned())
    }

    async fn create_new(&self, customer: Customer) -> Result<Customer, CustomerRepositoryError> {
        let mut records = self.lock()?;
        if records.iter().any(|c| c.id == customer.id) {
            return Err(CustomerRepositoryError::duplicate_id(customer.id));
        }
        records.push(customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        customer: Customer,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut records = self.lock()?;
        let Some(slot) = records.iter_mut().find(|c| c.id == customer.id) else {
            return Ok(None);
        };
        *slot = customer.clone();
        Ok(Some(customer))
    }

    async fn delete_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let mut records = self.lock()?;
        Ok(records
            .iter()
            .position(|c| c.id == id)
            .map(|index| records.remove(index)))
    }
}
