//! Handler abstraction and explicit registration.
//!
//! Handlers implement [`EndpointHandler`]; startup registers each one on an
//! [`EndpointRegistry`] and freezes the result into a [`DispatchTable`] that
//! mounts onto an actix `App`.

pub mod docs;
mod handler;
mod registry;
mod route;

pub use handler::{EndpointArgs, EndpointHandler, Lifetime, Reply, Verb};
pub use registry::{DispatchTable, EndpointDescriptor, EndpointRegistry, RegistrationError};
pub use route::{RouteTemplate, RouteTemplateError};
