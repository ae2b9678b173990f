//! Customer aggregate, its read projection, and the commands that mutate it.
//!
//! `Customer` is owned by the record store. Adapters only ever see the
//! [`CustomerDto`] projection, which deliberately omits the derived `state`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque customer identifier.
///
/// ## Invariants
/// - Identifiers produced by [`CustomerId::generate`] are never nil.
/// - An identifier never changes once assigned to a customer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Allocate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The nil identifier, used as the default for absent body fields.
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the nil identifier.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Customer record held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Read-facing projection of a [`Customer`].
///
/// Example JSON:
/// `{"id":"47584949-15b0-4270-9b3e-3cb697af3561","name":"IBM","address":"120 W. Big Blue St.","city":"Armonk","region":"NorthEast","postalCode":"093832","country":"USA"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: CustomerId,
    #[schema(example = "Acme")]
    pub name: String,
    #[schema(example = "1 Main St")]
    pub address: String,
    #[schema(example = "Springfield")]
    pub city: String,
    pub region: String,
    #[schema(example = "00000")]
    pub postal_code: String,
    #[schema(example = "USA")]
    pub country: String,
}

impl From<&Customer> for CustomerDto {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            region: customer.region.clone(),
            postal_code: customer.postal_code.clone(),
            country: customer.country.clone(),
        }
    }
}

/// Request body for `POST /customers`.
///
/// Missing fields deserialise as empty strings so the rule set can report
/// every absent value in one response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCustomerCommand {
    pub name: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// Request body for `PUT /customers/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCustomerCommand {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

/// Request body for `DELETE /customers/{id}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteCustomerCommand {
    pub customer_id: CustomerId,
}

/// Location attributes resolved by the enrichment hook on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub region: String,
    pub state: String,
    pub country: String,
}
