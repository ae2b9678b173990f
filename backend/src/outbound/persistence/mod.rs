//! Persistence adapters implementing the customer store port.
//!
//! Only an in-memory store exists. It keeps records for the lifetime of the
//! process and is shared by every worker through an `Arc`.

mod in_memory_customer_repository;

pub use in_memory_customer_repository::InMemoryCustomerRepository;
