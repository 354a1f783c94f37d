//! Protocol module for the Lanai RPC server.
//!
//! This module implements line-delimited JSON-RPC 2.0: validation, dispatch
//! and the error taxonomy.

pub mod jsonrpc;
