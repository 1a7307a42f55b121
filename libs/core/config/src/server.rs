use crate::{ConfigError, FromEnv, env_or_default, env_parse};
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_GRPC_PORT: u16 = 5001;

/// Listener configuration for the gRPC server
#[derive(Clone, Debug)]
pub struct GrpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl GrpcServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parse the address into a socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::ParseError {
                key: "GRPC_HOST".to_string(),
                details: e.to_string(),
            })
    }
}

impl FromEnv for GrpcServerConfig {
    /// Reads from environment variables:
    /// - GRPC_HOST: defaults to 127.0.0.1
    /// - GRPC_PORT: defaults to 5001
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("GRPC_HOST", &Ipv4Addr::LOCALHOST.to_string());
        let port = env_parse("GRPC_PORT", &DEFAULT_GRPC_PORT.to_string())?;

        Ok(Self { host, port })
    }
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST.to_string(),
            port: DEFAULT_GRPC_PORT,
        }
    }
}
