//! Server network and lifecycle configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Server network and lifecycle configuration.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind the server to.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum duration to wait for in-flight requests on shutdown, in
    /// seconds.
    #[arg(long, env = "SHUTDOWN_TIMEOUT_SECS", default_value_t = 30)]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Returns whether the server binds to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must not be 0");
        }
        Ok(())
    }

    /// Logs the configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server_addr(),
            shutdown_timeout_secs = self.shutdown_timeout_secs,
            "server configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_to_localhost() {
        let config = ServerConfig::default();
        assert!(!config.binds_to_all_interfaces());
        assert_eq!(config.server_addr().port(), 8080);
    }

    #[test]
    fn zero_port_is_invalid() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
