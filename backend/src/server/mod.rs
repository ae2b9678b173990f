//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use customer_api::Trace;
#[cfg(debug_assertions)]
use customer_api::doc::ApiDoc;
use customer_api::domain::CustomerServiceImpl;
use customer_api::domain::ports::FixtureLocationLookup;
use customer_api::inbound::http::endpoint::DispatchTable;
use customer_api::inbound::http::health::HealthState;
use customer_api::inbound::http::state::HttpState;
use customer_api::inbound::http::{build_dispatch_table, unmatched_route};
use customer_api::outbound::persistence::InMemoryCustomerRepository;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_http_state(config: &ServerConfig, health: Arc<HealthState>) -> HttpState {
    let repository = if config.seed_fixtures {
        InMemoryCustomerRepository::with_fixtures()
    } else {
        InMemoryCustomerRepository::new()
    };
    let service = CustomerServiceImpl::new(Arc::new(repository), Arc::new(FixtureLocationLookup));
    HttpState::new(Arc::new(service), health)
}

fn build_app(
    table: DispatchTable,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    #[cfg(debug_assertions)]
    let docs = ApiDoc::with_endpoints(&table);

    let app = App::new()
        .wrap(Trace)
        .configure(|cfg| table.configure(cfg));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", docs));

    app.default_service(web::to(unmatched_route))
}

/// Register every endpoint, bind the listener, and mark the service ready.
///
/// # Errors
/// Returns [`std::io::Error`] when endpoint registration fails or the
/// socket cannot be bound. Registration failures are reported as
/// [`std::io::ErrorKind::InvalidInput`].
pub fn create_server(health: Arc<HealthState>, config: ServerConfig) -> std::io::Result<Server> {
    let state = build_http_state(&config, Arc::clone(&health));
    let table = build_dispatch_table(state).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("endpoint registration failed: {err}"),
        )
    })?;

    let server = HttpServer::new(move || build_app(table.clone()))
        .bind(config.bind_addr)?
        .run();

    health.mark_ready();
    info!(addr = %config.bind_addr, seeded = config.seed_fixtures, "customer API listening");
    Ok(server)
}
