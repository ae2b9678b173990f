//! Shared helpers for HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::Value;

use customer_api::Trace;
use customer_api::domain::CustomerServiceImpl;
use customer_api::domain::ports::FixtureLocationLookup;
use customer_api::inbound::http::health::HealthState;
use customer_api::inbound::http::state::HttpState;
use customer_api::inbound::http::{build_dispatch_table, unmatched_route};
use customer_api::outbound::persistence::InMemoryCustomerRepository;

pub const IBM_ID: &str = "47584949-15b0-4270-9b3e-3cb697af3561";
pub const MICROSOFT_ID: &str = "5bc4942a-a832-4894-b232-82a54ea495ec";

/// Status, headers of interest, and decoded body of one response.
#[derive(Debug)]
pub struct Captured {
    pub status: u16,
    pub content_type: Option<String>,
    pub trace_id: Option<String>,
    pub body: Value,
}

/// Build the full application over a fresh in-memory store.
pub async fn init_app(
    seed_fixtures: bool,
    health: Arc<HealthState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let repository = if seed_fixtures {
        InMemoryCustomerRepository::with_fixtures()
    } else {
        InMemoryCustomerRepository::new()
    };
    let service = CustomerServiceImpl::new(Arc::new(repository), Arc::new(FixtureLocationLookup));
    let table = build_dispatch_table(HttpState::new(Arc::new(service), health))
        .expect("registration succeeds");

    test::init_service(
        App::new()
            .wrap(Trace)
            .configure(|cfg| table.configure(cfg))
            .default_service(web::to(unmatched_route)),
    )
    .await
}

fn header(res: &ServiceResponse<BoxBody>, name: &str) -> Option<String> {
    res.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Send `req` and capture the response.
pub async fn send<S>(app: &S, req: Request) -> Captured
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status().as_u16();
    let content_type = header(&res, "content-type");
    let trace_id = header(&res, "trace-id");
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Captured {
        status,
        content_type,
        trace_id,
        body,
    }
}

/// Violation field names from a validation problem body.
pub fn violation_fields(body: &Value) -> Vec<String> {
    body["extensions"]["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|error| error["field"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
