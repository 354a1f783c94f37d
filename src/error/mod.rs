//! Error module for the Lanai RPC server.
//!
//! Protocol-level failures (the five JSON-RPC error kinds) are plain values
//! defined in [`crate::protocol::jsonrpc::error`]. This module covers everything
//! else: configuration problems, transport failures and the umbrella error
//! returned by the binary.

use thiserror::Error;

pub mod config;
pub mod transport;

/// Result type alias used throughout the Lanai RPC server.
pub type LanaiResult<T> = Result<T, LanaiError>;

/// Core error enum for the Lanai RPC server.
#[derive(Error, Debug)]
pub enum LanaiError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors related to the listener or a connection stream.
    #[error("Transport error: {0}")]
    Transport(#[from] transport::TransportError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/Deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}
