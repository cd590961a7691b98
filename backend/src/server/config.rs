//! Server settings loaded via OrthoConfig.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Listener settings layered from CLI flags, `ACHIEVEMENTS_*` environment
/// variables, and configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACHIEVEMENTS")]
pub struct ServerSettings {
    /// Interface address to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
}

/// Raised when the configured host is not an IP address.
#[derive(Debug, thiserror::Error)]
#[error("invalid bind host {host:?}: {source}")]
pub struct InvalidBindAddr {
    host: String,
    source: std::net::AddrParseError,
}

impl ServerSettings {
    /// Configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, InvalidBindAddr> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|source| InvalidBindAddr {
            host: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}
