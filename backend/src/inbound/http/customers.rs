//! Customer endpoints.
//!
//! ```text
//! GET    /customers?offset&count
//! GET    /customers/{id}
//! POST   /customers
//! PUT    /customers/{id}
//! DELETE /customers/{id}
//! ```

use std::sync::Arc;

use actix_web::web::{Json, Path, Query};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use utoipa::openapi::path::OperationBuilder;

use super::endpoint::docs::{
    empty_response, json_array_response, json_request_body, json_response, problem_response,
};
use super::endpoint::{
    EndpointHandler, EndpointRegistry, Lifetime, RegistrationError, Reply, Verb,
};
use super::state::HttpState;
use crate::domain::ports::CustomerService;
use crate::domain::{
    ApiResult, CreateCustomerCommand, CreateCustomerRules, CustomerDto, CustomerId,
    DeleteCustomerCommand, DeleteCustomerRules, Error, RuleSet, UpdateCustomerCommand,
    UpdateCustomerRules, Violations,
};

const CUSTOMERS_TAG: &str = "customers";

fn not_found(id: CustomerId) -> Error {
    Error::not_found(format!("Could not find customer with id {id}"))
}

fn missing_customer(id: CustomerId) -> String {
    format!("A customer with the specified id ({id}) was not found")
}

/// Record a violation when `body_id` is set but names another customer.
fn require_matching_id(
    violations: &mut Violations,
    field: &str,
    body_id: CustomerId,
    route_id: CustomerId,
) {
    if !body_id.is_nil() && body_id != route_id {
        violations.push(field, format!("{field} must match the id in the route"));
    }
}

async fn customer_exists(customers: &dyn CustomerService, id: CustomerId) -> ApiResult<bool> {
    Ok(customers.get_by_id(id).await?.is_some())
}

/// Query string accepted by `GET /customers`.
///
/// Both bounds are checked but not yet applied to the result.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersQuery {
    /// Number of records to skip; must not be negative.
    pub offset: Option<i64>,
    /// Maximum number of records; must be at least one.
    pub count: Option<i64>,
}

/// `GET /customers`
pub struct GetAllCustomers {
    customers: Arc<dyn CustomerService>,
}

#[async_trait(?Send)]
impl EndpointHandler for GetAllCustomers {
    type Args = (Query<ListCustomersQuery>,);
    type Output = Vec<CustomerDto>;

    const NAME: &'static str = "getAllCustomers";
    const TAG: &'static str = CUSTOMERS_TAG;
    const VERB: Verb = Verb::Get;
    const ROUTE: &'static str = "/customers";
    const LIFETIME: Lifetime = Lifetime::Singleton;

    async fn validate(&self, args: &Self::Args) -> ApiResult<()> {
        let (query,) = args;
        let mut violations = Violations::new();
        if query.offset.is_some_and(|offset| offset < 0) {
            violations.push("offset", "offset cannot be negative");
        }
        if query.count.is_some_and(|count| count < 1) {
            violations.push("count", "count must be greater than zero");
        }
        violations.into_result()
    }

    async fn handle(&self, _args: Self::Args) -> ApiResult<Reply<Vec<CustomerDto>>> {
        let customers = self.customers.get_all().await?;
        if customers.is_empty() {
            return Ok(Reply::NoContent);
        }
        Ok(Reply::Json(customers))
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
            .summary(Some("List customers"))
            .parameters(Some(ListCustomersQuery::into_params(|| None)))
            .response("200", json_array_response("Customers", "CustomerDto"))
            .response("204", empty_response("No customers stored"))
            .response("400", problem_response("Invalid offset or count"))
    }
}

/// `GET /customers/{id}`
pub struct GetCustomer {
    customers: Arc<dyn CustomerService>,
}

#[async_trait(?Send)]
impl EndpointHandler for GetCustomer {
    type Args = (Path<CustomerId>,);
    type Output = CustomerDto;

    const NAME: &'static str = "getCustomer";
    const TAG: &'static str = CUSTOMERS_TAG;
    const VERB: Verb = Verb::Get;
    const ROUTE: &'static str = "/customers/{id}";

    async fn validate(&self, args: &Self::Args) -> ApiResult<()> {
        let mut violations = Violations::new();
        if args.0.is_nil() {
            violations.push("id", "id is invalid");
        }
        violations.into_result()
    }

    async fn handle(&self, args: Self::Args) -> ApiResult<Reply<CustomerDto>> {
        let id = args.0.into_inner();
        match self.customers.get_by_id(id).await? {
            Some(customer) => Ok(Reply::Json(customer)),
            None => Err(not_found(id)),
        }
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
            .summary(Some("Fetch one customer"))
            .response("200", json_response("The customer", "CustomerDto"))
            .response("400", problem_response("Malformed or nil id"))
            .response("404", problem_response("No such customer"))
    }
}

/// `POST /customers`
pub struct CreateNewCustomer {
    customers: Arc<dyn CustomerService>,
}

#[async_trait(?Send)]
impl EndpointHandler for CreateNewCustomer {
    type Args = (Json<CreateCustomerCommand>,);
    type Output = CustomerDto;

    const NAME: &'static str = "createNewCustomer";
    const TAG: &'static str = CUSTOMERS_TAG;
    const VERB: Verb = Verb::Post;
    const ROUTE: &'static str = "/customers";

    async fn validate(&self, args: &Self::Args) -> ApiResult<()> {
        CreateCustomerRules.ensure_valid(&args.0)
    }

    async fn handle(&self, args: Self::Args) -> ApiResult<Reply<CustomerDto>> {
        let created = self
            .customers
            .create_new_customer(args.0.into_inner())
            .await?;
        debug!(customer_id = %created.id, "customer created");
        Ok(Reply::Json(created))
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
            .summary(Some("Create a customer"))
            .request_body(Some(json_request_body("CreateCustomerCommand")))
            .response("200", json_response("The created customer", "CustomerDto"))
            .response("400", problem_response("Validation failed"))
    }
}

/// `PUT /customers/{id}`
///
/// Checks run fail-fast: an id mismatch or an unknown customer rejects the
/// request before the field rules are evaluated.
pub struct UpdateCustomer {
    customers: Arc<dyn CustomerService>,
}

impl UpdateCustomer {
    fn command(route_id: CustomerId, body: &UpdateCustomerCommand) -> UpdateCustomerCommand {
        UpdateCustomerCommand {
            id: route_id,
            ..body.clone()
        }
    }
}

#[async_trait(?Send)]
impl EndpointHandler for UpdateCustomer {
    type Args = (Path<CustomerId>, Json<UpdateCustomerCommand>);
    type Output = CustomerDto;

    const NAME: &'static str = "updateCustomer";
    const TAG: &'static str = CUSTOMERS_TAG;
    const VERB: Verb = Verb::Put;
    const ROUTE: &'static str = "/customers/{id}";
    const LIFETIME: Lifetime = Lifetime::PerScope;

    async fn validate(&self, args: &Self::Args) -> ApiResult<()> {
        let (route_id, body) = args;
        let route_id = **route_id;

        let mut mismatch = Violations::new();
        require_matching_id(&mut mismatch, "id", body.id, route_id);
        mismatch.into_result()?;

        if !customer_exists(self.customers.as_ref(), route_id).await? {
            let mut missing = Violations::new();
            missing.push("id", missing_customer(route_id));
            return missing.into_result();
        }

        UpdateCustomerRules.ensure_valid(&Self::command(route_id, body))
    }

    async fn handle(&self, args: Self::Args) -> ApiResult<Reply<CustomerDto>> {
        let (route_id, body) = args;
        let route_id = route_id.into_inner();
        let command = Self::command(route_id, &body);
        match self.customers.update_customer(command).await? {
            Some(customer) => Ok(Reply::Json(customer)),
            None => Err(not_found(route_id)),
        }
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
            .summary(Some("Replace a customer"))
            .request_body(Some(json_request_body("UpdateCustomerCommand")))
            .response("200", json_response("The updated customer", "CustomerDto"))
            .response("400", problem_response("Validation failed or unknown id"))
            .response("404", problem_response("Customer removed concurrently"))
    }
}

/// `DELETE /customers/{id}`
///
/// Every check runs and all failures are reported together.
pub struct DeleteCustomer {
    customers: Arc<dyn CustomerService>,
}

#[async_trait(?Send)]
impl EndpointHandler for DeleteCustomer {
    type Args = (Path<CustomerId>, Json<DeleteCustomerCommand>);
    type Output = CustomerDto;

    const NAME: &'static str = "deleteCustomer";
    const TAG: &'static str = CUSTOMERS_TAG;
    const VERB: Verb = Verb::Delete;
    const ROUTE: &'static str = "/customers/{id}";

    async fn validate(&self, args: &Self::Args) -> ApiResult<()> {
        let (route_id, body) = args;
        let route_id = **route_id;

        let mut violations = Violations::new();
        if !customer_exists(self.customers.as_ref(), route_id).await? {
            violations.push("id", missing_customer(route_id));
        }
        violations.extend(DeleteCustomerRules.check(body));
        require_matching_id(&mut violations, "customerId", body.customer_id, route_id);
        violations.into_result()
    }

    async fn handle(&self, args: Self::Args) -> ApiResult<Reply<CustomerDto>> {
        let route_id = args.0.into_inner();
        let command = DeleteCustomerCommand {
            customer_id: route_id,
        };
        match self.customers.delete_customer(command).await? {
            Some(customer) => Ok(Reply::Json(customer)),
            None => Err(not_found(route_id)),
        }
    }

    fn document(operation: OperationBuilder) -> OperationBuilder {
        operation
            .summary(Some("Delete a customer"))
            .request_body(Some(json_request_body("DeleteCustomerCommand")))
            .response("200", json_response("The deleted customer", "CustomerDto"))
            .response("400", problem_response("Validation failed or unknown id"))
            .response("404", problem_response("Customer removed concurrently"))
    }
}

/// Register every customer endpoint.
///
/// # Errors
/// Propagates the first [`RegistrationError`].
pub fn register_customer_endpoints(
    registry: &mut EndpointRegistry<HttpState>,
) -> Result<(), RegistrationError> {
    registry.register(|state: &HttpState| GetAllCustomers {
        customers: Arc::clone(&state.customers),
    })?;
    registry.register(|state: &HttpState| GetCustomer {
        customers: Arc::clone(&state.customers),
    })?;
    registry.register(|state: &HttpState| CreateNewCustomer {
        customers: Arc::clone(&state.customers),
    })?;
    registry.register(|state: &HttpState| UpdateCustomer {
        customers: Arc::clone(&state.customers),
    })?;
    registry.register(|state: &HttpState| DeleteCustomer {
        customers: Arc::clone(&state.customers),
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "customers_tests.rs"]
mod tests;
