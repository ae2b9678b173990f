//! Explicit endpoint registration and the frozen dispatch table.
//!
//! Startup code registers every handler type once through
//! [`EndpointRegistry::register`]. Registration reads the handler's verb,
//! route and lifetime, rejects conflicts eagerly, and stores a type-erased
//! invocation. [`EndpointRegistry::freeze`] then produces a
//! [`DispatchTable`], which is immutable, cheap to clone, and shared by
//! every actix worker.

use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, info};
use utoipa::openapi::path::{OperationBuilder, PathItem};
use utoipa::openapi::{Paths, PathsBuilder};

use super::docs::path_parameter;
use super::handler::{EndpointArgs, EndpointHandler, Lifetime, Reply, Verb};
use super::route::{RouteTemplate, RouteTemplateError};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::error::{ApiProblem, unmatched_route};

/// Startup-fatal registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("handler `{handler}` has an invalid route: {source}")]
    InvalidRoute {
        handler: &'static str,
        #[source]
        source: RouteTemplateError,
    },
    #[error("handler `{handler}` is already registered")]
    DuplicateHandler { handler: &'static str },
    #[error("{verb} {route} is already served by `{existing}`; cannot register `{handler}`")]
    DuplicateRoute {
        verb: Verb,
        route: String,
        existing: &'static str,
        handler: &'static str,
    },
    #[error(
        "route `{route}` of `{handler}` names its placeholders differently from `{existing}`"
    )]
    PlaceholderMismatch {
        route: String,
        existing: String,
        handler: &'static str,
    },
    #[error("route `{route}` of `{handler}` has {placeholders} placeholders but only {arity} inputs")]
    PlaceholderArity {
        route: String,
        handler: &'static str,
        placeholders: usize,
        arity: usize,
    },
}

/// Read-only description of a registered endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: &'static str,
    pub handler_type: &'static str,
    pub tag: &'static str,
    pub arity: usize,
    pub verb: Verb,
    pub route: RouteTemplate,
    pub lifetime: Lifetime,
}

type Factory<H> = Arc<dyn Fn() -> H + Send + Sync>;

enum Resolver<H> {
    PerCall(Factory<H>),
    Singleton(Arc<H>),
    PerScope(Factory<H>),
}

/// Handler instances built for the current request, keyed by handler type.
#[derive(Default)]
struct ScopedInstances(HashMap<TypeId, Arc<dyn Any + Send + Sync>>);

impl<H: EndpointHandler> Resolver<H> {
    fn resolve(&self, req: &HttpRequest) -> Arc<H> {
        match self {
            Self::PerCall(factory) => Arc::new(factory()),
            Self::Singleton(instance) => Arc::clone(instance),
            Self::PerScope(factory) => {
                let mut extensions = req.extensions_mut();
                let mut scoped = extensions.remove::<ScopedInstances>().unwrap_or_default();
                let cached = scoped
                    .0
                    .get(&TypeId::of::<H>())
                    .cloned()
                    .and_then(|instance| instance.downcast::<H>().ok());
                let instance = cached.unwrap_or_else(|| {
                    let built = Arc::new(factory());
                    scoped.0.insert(TypeId::of::<H>(), built.clone());
                    built
                });
                extensions.insert(scoped);
                instance
            }
        }
    }
}

type Invocation = LocalBoxFuture<'static, Result<HttpResponse, ApiProblem>>;

trait ErasedEndpoint: Send + Sync {
    fn invoke(&self, req: HttpRequest, payload: Payload) -> Invocation;
}

struct BoundEndpoint<H> {
    resolver: Resolver<H>,
}

async fn run<H: EndpointHandler>(handler: &H, args: H::Args) -> ApiResult<Reply<H::Output>> {
    handler.validate(&args).await?;
    handler.handle(args).await
}

impl<H: EndpointHandler> ErasedEndpoint for BoundEndpoint<H> {
    fn invoke(&self, req: HttpRequest, mut payload: Payload) -> Invocation {
        let handler = self.resolver.resolve(&req);
        let extraction = <H::Args as FromRequest>::from_request(&req, &mut payload);

        Box::pin(async move {
            let outcome = match extraction.await {
                Ok(args) => run(handler.as_ref(), args).await,
                Err(err) => {
                    let err: actix_web::Error = err.into();
                    debug!(endpoint = H::NAME, error = %err, "request binding failed");
                    Err(Error::invalid_request(err.to_string()))
                }
            };

            outcome
                .map(Reply::into_response)
                .map_err(|error| ApiProblem::new(error, req.path()))
        })
    }
}

struct RegisteredEndpoint {
    descriptor: EndpointDescriptor,
    endpoint: Arc<dyn ErasedEndpoint>,
    document: fn(OperationBuilder) -> OperationBuilder,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RouteKey {
    template: String,
    verb: Verb,
}

/// Mutable registration phase.
///
/// `C` is the dependency context handed to every handler factory.
pub struct EndpointRegistry<C> {
    context: C,
    endpoints: BTreeMap<RouteKey, RegisteredEndpoint>,
    handler_types: HashSet<TypeId>,
    shapes: HashMap<String, RouteTemplate>,
}

impl<C> EndpointRegistry<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Start an empty registry over `context`.
    pub fn new(context: C) -> Self {
        Self {
            context,
            endpoints: BTreeMap::new(),
            handler_types: HashSet::new(),
            shapes: HashMap::new(),
        }
    }

    /// Register handler type `H`, built from the context by `factory`.
    ///
    /// # Errors
    /// Returns a [`RegistrationError`] when the route is malformed, declares
    /// more placeholders than `H` has inputs, conflicts with an existing
    /// (verb, route shape), or when `H` is already registered. Nothing is
    /// recorded on failure.
    pub fn register<H, F>(&mut self, factory: F) -> Result<&EndpointDescriptor, RegistrationError>
    where
        H: EndpointHandler,
        F: Fn(&C) -> H + Send + Sync + 'static,
    {
        let descriptor = self.check::<H>()?;

        let context = self.context.clone();
        let build: Factory<H> = Arc::new(move || factory(&context));
        let resolver = match H::LIFETIME {
            Lifetime::PerCall => Resolver::PerCall(build),
            Lifetime::Singleton => Resolver::Singleton(Arc::new(build())),
            Lifetime::PerScope => Resolver::PerScope(build),
        };

        info!(
            endpoint = descriptor.name,
            verb = %descriptor.verb,
            route = %descriptor.route,
            lifetime = ?descriptor.lifetime,
            "endpoint registered"
        );

        self.handler_types.insert(TypeId::of::<H>());
        self.shapes
            .entry(descriptor.route.shape())
            .or_insert_with(|| descriptor.route.clone());
        let key = RouteKey {
            template: descriptor.route.as_str().to_owned(),
            verb: descriptor.verb,
        };
        let registered = self.endpoints.entry(key).or_insert(RegisteredEndpoint {
            descriptor,
            endpoint: Arc::new(BoundEndpoint { resolver }),
            document: H::document,
        });
        Ok(&registered.descriptor)
    }

    fn check<H: EndpointHandler>(&self) -> Result<EndpointDescriptor, RegistrationError> {
        let handler = type_name::<H>();
        let route = RouteTemplate::parse(H::ROUTE)
            .map_err(|source| RegistrationError::InvalidRoute { handler, source })?;

        if self.handler_types.contains(&TypeId::of::<H>()) {
            return Err(RegistrationError::DuplicateHandler { handler });
        }

        let arity = <H::Args as EndpointArgs>::ARITY;
        let placeholders = route.placeholder_count();
        if placeholders > arity {
            return Err(RegistrationError::PlaceholderArity {
                route: route.to_string(),
                handler,
                placeholders,
                arity,
            });
        }

        if let Some(existing) = self.shapes.get(&route.shape()) {
            if existing != &route {
                return Err(RegistrationError::PlaceholderMismatch {
                    route: route.to_string(),
                    existing: existing.to_string(),
                    handler,
                });
            }
            let key = RouteKey {
                template: route.as_str().to_owned(),
                verb: H::VERB,
            };
            if let Some(taken) = self.endpoints.get(&key) {
                return Err(RegistrationError::DuplicateRoute {
                    verb: H::VERB,
                    route: route.to_string(),
                    existing: taken.descriptor.name,
                    handler: H::NAME,
                });
            }
        }

        Ok(EndpointDescriptor {
            name: H::NAME,
            handler_type: handler,
            tag: H::TAG,
            arity,
            verb: H::VERB,
            route,
            lifetime: H::LIFETIME,
        })
    }

    /// Finish registration.
    #[must_use]
    pub fn freeze(self) -> DispatchTable {
        DispatchTable {
            endpoints: Arc::new(self.endpoints),
        }
    }
}

/// Immutable (verb, route) to invocation map.
#[derive(Clone)]
pub struct DispatchTable {
    endpoints: Arc<BTreeMap<RouteKey, RegisteredEndpoint>>,
}

impl DispatchTable {
    /// Registered endpoints, ordered by route then verb.
    pub fn descriptors(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.endpoints.values().map(|entry| &entry.descriptor)
    }

    /// The endpoint serving `verb` on the exact route template.
    #[must_use]
    pub fn descriptor(&self, verb: Verb, route: &str) -> Option<&EndpointDescriptor> {
        let key = RouteKey {
            template: route.to_owned(),
            verb,
        };
        self.endpoints.get(&key).map(|entry| &entry.descriptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    fn by_template(&self) -> BTreeMap<&str, Vec<&RegisteredEndpoint>> {
        let mut grouped: BTreeMap<&str, Vec<&RegisteredEndpoint>> = BTreeMap::new();
        for (key, entry) in self.endpoints.iter() {
            grouped.entry(key.template.as_str()).or_default().push(entry);
        }
        grouped
    }

    /// Mount one actix resource per route template.
    ///
    /// Verbs without a handler on a known template answer with the same
    /// not-found problem as unknown paths.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for (template, entries) in self.by_template() {
            let mut resource = web::resource(template).default_service(web::to(unmatched_route));
            for entry in entries {
                let endpoint = Arc::clone(&entry.endpoint);
                resource = resource.route(web::method(entry.descriptor.verb.as_method()).to(
                    move |req: HttpRequest, payload: web::Payload| {
                        let endpoint = Arc::clone(&endpoint);
                        async move { endpoint.invoke(req, payload.into_inner()).await }
                    },
                ));
            }
            cfg.service(resource);
        }
    }

    /// OpenAPI path items for every registered endpoint.
    #[must_use]
    pub fn openapi_paths(&self) -> Paths {
        let mut paths = PathsBuilder::new();
        for (template, entries) in self.by_template() {
            let mut item = PathItem::default();
            for entry in entries {
                let descriptor = &entry.descriptor;
                let operation = descriptor.route.placeholders().fold(
                    OperationBuilder::new()
                        .operation_id(Some(descriptor.name))
                        .tag(descriptor.tag),
                    |operation, name| operation.parameter(path_parameter(name)),
                );
                let operation = Some((entry.document)(operation).build());
                match descriptor.verb {
                    Verb::Get => item.get = operation,
                    Verb::Post => item.post = operation,
                    Verb::Put => item.put = operation,
                    Verb::Delete => item.delete = operation,
                }
            }
            paths = paths.path(template, item);
        }
        paths.build()
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.descriptors()).finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
