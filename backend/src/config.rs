//! Service settings loaded via OrthoConfig.
//!
//! Values layer as defaults, then configuration file, then `CUSTOMER_API_*`
//! environment variables, then command-line flags.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Settings rejected after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid listen host `{host}`")]
    InvalidHost { host: String },
}

/// Runtime settings for the customer API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CUSTOMER_API")]
pub struct AppSettings {
    /// Interface to listen on.
    pub host: Option<String>,
    /// TCP port to listen on.
    pub port: Option<u16>,
    /// Start with an empty store instead of the demonstration customers.
    #[ortho_config(default = false)]
    pub skip_fixtures: bool,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether the demonstration customers are loaded at startup.
    pub fn seed_fixtures(&self) -> bool {
        !self.skip_fixtures
    }

    /// Socket address the server binds to.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}
