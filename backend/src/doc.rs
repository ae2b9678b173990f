//! OpenAPI documentation.
//!
//! [`ApiDoc`] carries the document metadata and component schemas. Paths are
//! not declared here: they are generated from the frozen dispatch table by
//! [`ApiDoc::with_endpoints`], so the document always matches what is
//! actually mounted.

use utoipa::OpenApi;

use crate::domain::{
    CreateCustomerCommand, CustomerDto, CustomerId, DeleteCustomerCommand, ErrorCode,
    FieldViolation, UpdateCustomerCommand,
};
use crate::inbound::http::endpoint::DispatchTable;
use crate::inbound::http::error::{ProblemDetails, ProblemExtensions};
use crate::inbound::http::health::ProbeStatus;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer API",
        description = "CRUD operations on customer records plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    components(schemas(
        CustomerId,
        CustomerDto,
        CreateCustomerCommand,
        UpdateCustomerCommand,
        DeleteCustomerCommand,
        FieldViolation,
        ErrorCode,
        ProblemDetails,
        ProblemExtensions,
        ProbeStatus,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Full document including one path item per registered route.
    #[must_use]
    pub fn with_endpoints(table: &DispatchTable) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        doc.paths = table.openapi_paths();
        doc
    }
}

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path generation.

    use super::*;
    use std::sync::Arc;

    use crate::domain::ports::MockCustomerService;
    use crate::inbound::http::build_dispatch_table;
    use crate::inbound::http::health::HealthState;
    use crate::inbound::http::state::HttpState;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn customer_schema_uses_camel_case_and_omits_state() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let customer = schemas.get("CustomerDto").expect("CustomerDto schema");

        assert_object_schema_has_field(customer, "postalCode");
        if let RefOr::T(Schema::Object(obj)) = customer {
            assert!(!obj.properties.contains_key("state"));
        }
    }

    #[test]
    fn problem_schema_has_rfc7807_members() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let problem = schemas.get("ProblemDetails").expect("ProblemDetails schema");

        for field in ["type", "title", "status", "detail", "instance", "extensions"] {
            assert_object_schema_has_field(problem, field);
        }
    }

    #[test]
    fn paths_come_from_the_dispatch_table() {
        let state = HttpState::new(
            Arc::new(MockCustomerService::new()),
            Arc::new(HealthState::new()),
        );
        let table = build_dispatch_table(state).expect("registration succeeds");
        let doc = ApiDoc::with_endpoints(&table);

        let item = doc.paths.paths.get("/customers/{id}").expect("item path");
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
        assert!(item.post.is_none());

        let collection = doc.paths.paths.get("/customers").expect("collection path");
        assert!(collection.get.is_some());
        assert!(collection.post.is_some());
        assert!(doc.paths.paths.contains_key("/health/ready"));
    }
}
