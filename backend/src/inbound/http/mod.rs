//! HTTP inbound adapter.
//!
//! Handlers are plain types registered on an
//! [`endpoint::EndpointRegistry`]; [`build_dispatch_table`] performs the
//! full registration used by the server and by integration tests.

pub mod customers;
pub mod endpoint;
pub mod error;
pub mod health;
pub mod state;

use tracing::info;

use self::endpoint::{DispatchTable, EndpointRegistry, RegistrationError};
use self::health::{LiveProbe, ReadyProbe};
use self::state::HttpState;

pub use self::error::{ApiProblem, ProblemDetails, unmatched_route};

/// Register every endpoint over `state` and freeze the result.
///
/// # Errors
/// Returns the first [`RegistrationError`]; the server must not start.
pub fn build_dispatch_table(state: HttpState) -> Result<DispatchTable, RegistrationError> {
    let mut registry = EndpointRegistry::new(state);
    registry.register(|state: &HttpState| LiveProbe::new(state.health.clone()))?;
    registry.register(|state: &HttpState| ReadyProbe::new(state.health.clone()))?;
    customers::register_customer_endpoints(&mut registry)?;

    let table = registry.freeze();
    info!(endpoints = table.len(), "dispatch table frozen");
    Ok(table)
}
