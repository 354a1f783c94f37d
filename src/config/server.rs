//! Server configuration module.
//!
//! Settings for the TCP listener and per-connection limits.

use super::ConfigResult;
use super::Validate;
use crate::error::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 10000;

/// Default upper bound on a single request line, in bytes.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name of the server (used in logs)
    pub name: String,

    /// Address to bind the TCP listener to
    pub address: SocketAddr,

    /// Maximum length of one request line in bytes, excluding the terminator
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "lanai-rpc".to_string(),
            address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Server name cannot be empty".to_string(),
            ));
        }

        if self.max_message_size == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "server.max_message_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
