//! HTTP server configuration.

use std::net::{IpAddr, SocketAddr};

use clap::Args;

/// HTTP server options.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to
    #[arg(long = "host", env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(long = "port", env = "SERVER_PORT", default_value = "8080")]
    pub port: u16,
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "0.0.0.0".parse().unwrap(),
            port: 9090,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9090");
    }
}
