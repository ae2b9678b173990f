//! Builders for the OpenAPI fragments handlers attach to their operations.

use utoipa::openapi::path::{Parameter, ParameterBuilder, ParameterIn};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{ArrayBuilder, ObjectBuilder, Schema, Type};
use utoipa::openapi::{ContentBuilder, Ref, RefOr, Required, Response, ResponseBuilder};

pub(crate) const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

/// Response carrying a JSON body of the named component schema.
#[must_use]
pub fn json_response(description: &str, schema: &str) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(schema_ref(schema))).build(),
        )
        .build()
}

/// Response carrying a JSON array of the named component schema.
#[must_use]
pub fn json_array_response(description: &str, item_schema: &str) -> Response {
    let array = Schema::Array(ArrayBuilder::new().items(schema_ref(item_schema)).build());
    ResponseBuilder::new()
        .description(description)
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(RefOr::T(array))).build(),
        )
        .build()
}

/// Response without a body.
#[must_use]
pub fn empty_response(description: &str) -> Response {
    ResponseBuilder::new().description(description).build()
}

/// Problem-details error response.
#[must_use]
pub fn problem_response(description: &str) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content(
            PROBLEM_CONTENT_TYPE,
            ContentBuilder::new()
                .schema(Some(schema_ref("ProblemDetails")))
                .build(),
        )
        .build()
}

/// Required JSON request body of the named component schema.
#[must_use]
pub fn json_request_body(schema: &str) -> RequestBody {
    RequestBodyBuilder::new()
        .content(
            "application/json",
            ContentBuilder::new().schema(Some(schema_ref(schema))).build(),
        )
        .required(Some(Required::True))
        .build()
}

pub(crate) fn path_parameter(name: &str) -> Parameter {
    let string = Schema::Object(ObjectBuilder::new().schema_type(Type::String).build());
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(RefOr::T(string)))
        .build()
}
