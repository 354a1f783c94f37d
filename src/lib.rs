//! Lanai RPC Server Library
//!
//! A JSON-RPC 2.0 server for resource-constrained environments. Clients hold
//! persistent TCP connections and exchange one JSON message per line.
//!
//! # Architecture
//!
//! Data flows strictly downward:
//! - [`server::Server`] accepts connections and spawns one task per connection
//! - [`server::ConnectionHandler`] reads a line, processes it, writes the answer
//! - [`protocol::jsonrpc::RequestProcessor`] validates and dispatches one line
//! - [`protocol::jsonrpc::MethodRegistry`] maps method names to handlers
//! - [`protocol::jsonrpc::RpcError`] renders the five protocol error kinds

// Re-export public modules
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the Lanai RPC server.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
