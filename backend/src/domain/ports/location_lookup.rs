//! Driven port for resolving location attributes of new customers.
//!
//! Production deployments would back this with an address service. The
//! fixture implementation fills the fields with fixed placeholders.

use async_trait::async_trait;

use crate::domain::{CreateCustomerCommand, Error, Location};

/// Resolve region, state and country for a customer being created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn resolve(&self, command: &CreateCustomerCommand) -> Result<Location, Error>;
}

/// Placeholder lookup used until a real address service is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLocationLookup;

impl FixtureLocationLookup {
    pub const REGION: &'static str = "Region found by lookup";
    pub const STATE: &'static str = "State found by lookup";
    pub const COUNTRY: &'static str = "Country found by lookup";
}

#[async_trait]
impl LocationLookup for FixtureLocationLookup {
    async fn resolve(&self, _command: &CreateCustomerCommand) -> Result<Location, Error> {
        Ok(Location {
            region: Self::REGION.to_owned(),
            state: Self::STATE.to_owned(),
            country: Self::COUNTRY.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookup_ignores_command_values() {
        let command = CreateCustomerCommand {
            region: "Somewhere".to_owned(),
            country: "Elsewhere".to_owned(),
            ..CreateCustomerCommand::default()
        };

        let location = FixtureLocationLookup
            .resolve(&command)
            .await
            .expect("fixture lookup succeeds");

        assert_eq!(location.region, FixtureLocationLookup::REGION);
        assert_eq!(location.state, FixtureLocationLookup::STATE);
        assert_eq!(location.country, FixtureLocationLookup::COUNTRY);
    }
}
