//! Transport error module.
//!
//! This module defines error types raised by the TCP listener and by
//! per-connection stream handling. None of these map onto a JSON-RPC error
//! envelope; a connection that hits one is logged and closed.

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur during transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error when the listener cannot be bound.
    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        /// The address the server tried to bind
        addr: SocketAddr,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when reading a line from a connection.
    #[error("Read error: {0}")]
    Read(#[source] io::Error),

    /// Error when writing or flushing a response.
    #[error("Write error: {0}")]
    Write(#[source] io::Error),

    /// Error when a received line is not valid UTF-8.
    #[error("Received line is not valid UTF-8")]
    InvalidUtf8,

    /// Error when the server is already serving and the operation needs it stopped.
    #[error("Server is already running")]
    AlreadyRunning,

    /// Error when the accept task terminated abnormally.
    #[error("Listener task failed: {0}")]
    ListenerTask(String),
}
