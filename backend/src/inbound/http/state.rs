//! Dependency context handed to endpoint factories.

use std::sync::Arc;

use super::health::HealthState;
use crate::domain::ports::CustomerService;

/// Ports and shared state the HTTP handlers depend on.
#[derive(Clone)]
pub struct HttpState {
    pub customers: Arc<dyn CustomerService>,
    pub health: Arc<HealthState>,
}

impl HttpState {
    pub fn new(customers: Arc<dyn CustomerService>, health: Arc<HealthState>) -> Self {
        Self { customers, health }
    }
}
