//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod customer_repository;
mod customer_service;
mod location_lookup;

#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
#[cfg(test)]
pub use customer_service::MockCustomerService;
pub use customer_service::CustomerService;
#[cfg(test)]
pub use location_lookup::MockLocationLookup;
pub use location_lookup::{FixtureLocationLookup, LocationLookup};
