//! The endpoint handler abstraction.
//!
//! A handler is a type that binds one HTTP verb and route template to one
//! business operation. Its inputs are a tuple of actix extractors, resolved
//! positionally from the request before anything else runs. The dispatcher
//! always calls [`EndpointHandler::validate`] before
//! [`EndpointHandler::handle`]; a validation failure short-circuits the
//! request and is reported unchanged.

use std::fmt;

use actix_web::http::Method;
use actix_web::{FromRequest, HttpResponse};
use async_trait::async_trait;
use serde::Serialize;
use utoipa::openapi::path::OperationBuilder;

use crate::domain::ApiResult;

/// HTTP verbs a handler can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// `GET`: read without side effects.
    Get,
    /// `POST`: create a resource.
    Post,
    /// `PUT`: replace a resource.
    Put,
    /// `DELETE`: remove a resource.
    Delete,
}

impl Verb {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How handler instances are reused across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// A new instance for every request.
    #[default]
    PerCall,
    /// One instance built at registration and shared by every request.
    Singleton,
    /// At most one instance per request scope.
    PerScope,
}

/// Successful handler outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    /// `200 OK` with a JSON body.
    Json(T),
    /// `204 No Content`.
    NoContent,
}

impl<T: Serialize> Reply<T> {
    pub(crate) fn into_response(self) -> HttpResponse {
        match self {
            Self::Json(body) => HttpResponse::Ok().json(body),
            Self::NoContent => HttpResponse::NoContent().finish(),
        }
    }
}

/// Handler input tuples.
///
/// Implemented for tuples of zero to five extractors; anything wider does
/// not compile. `ARITY` bounds how many route placeholders a handler may
/// declare.
pub trait EndpointArgs: FromRequest + 'static {
    const ARITY: usize;
}

macro_rules! endpoint_args {
    ($arity:literal; $($ty:ident),*) => {
        impl<$($ty),*> EndpointArgs for ($($ty,)*)
        where
            $($ty: FromRequest + 'static,)*
        {
            const ARITY: usize = $arity;
        }
    };
}

endpoint_args!(0;);
endpoint_args!(1; A);
endpoint_args!(2; A, B);
endpoint_args!(3; A, B, C);
endpoint_args!(4; A, B, C, D);
endpoint_args!(5; A, B, C, D, E);

/// A type that serves one verb and route.
///
/// # Examples
/// ```
/// use async_trait::async_trait;
/// use customer_api::domain::ApiResult;
/// use customer_api::inbound::http::endpoint::{EndpointHandler, Reply, Verb};
///
/// struct Ping;
///
/// #[async_trait(?Send)]
/// impl EndpointHandler for Ping {
///     type Args = ();
///     type Output = &'static str;
///
///     const NAME: &'static str = "ping";
///     const VERB: Verb = Verb::Get;
///     const ROUTE: &'static str = "/ping";
///
///     async fn handle(&self, _args: ()) -> ApiResult<Reply<&'static str>> {
///         Ok(Reply::Json("pong"))
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait EndpointHandler: Send + Sync + 'static {
    /// Extracted inputs, in the order they are resolved.
    type Args: EndpointArgs;
    /// Success payload.
    type Output: Serialize + 'static;

    /// Stable operation name, also used as the OpenAPI operation id.
    const NAME: &'static str;
    /// OpenAPI tag grouping the operation.
    const TAG: &'static str = "default";
    /// Verb the handler answers.
    const VERB: Verb;
    /// Route template, e.g. `/customers/{id}`.
    const ROUTE: &'static str;
    /// Instance reuse policy.
    const LIFETIME: Lifetime = Lifetime::PerCall;

    /// Checks that run before [`Self::handle`].
    async fn validate(&self, _args: &Self::Args) -> ApiResult<()> {
        Ok(())
    }

    /// Perform the operation.
    async fn handle(&self, args: Self::Args) -> ApiResult<Reply<Self::Output>>;

    /// Add request body and response documentation to the generated
    /// operation. Path parameters, tags and the operation id are filled in
    /// by the registry.
    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
    }
}
