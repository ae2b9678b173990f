//! HTTP server configuration object.

use std::net::SocketAddr;

use customer_api::config::{AppSettings, SettingsError};

/// Inputs needed to build and bind the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) seed_fixtures: bool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            seed_fixtures: false,
        }
    }

    /// Seed the store with the demonstration customers.
    #[must_use]
    pub fn with_fixtures(mut self, seed_fixtures: bool) -> Self {
        self.seed_fixtures = seed_fixtures;
        self
    }

    /// Derive the server configuration from loaded settings.
    ///
    /// # Errors
    /// Propagates [`SettingsError`] for an unusable listen address.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(settings.bind_addr()?).with_fixtures(settings.seed_fixtures()))
    }
}
