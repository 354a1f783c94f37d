// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 request processing for the Lanai RPC server.
//!
//! This module implements the [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification)
//! for one message per line. Batches are not supported: a line holding an
//! array is an invalid request.
//!
//! # Features
//!
//! - Positional and named params, checked against each method's declared names
//! - Notifications: a successful call without an `id` produces no output
//! - Synchronous and asynchronous handlers behind one [`MethodHandler`] trait
//! - Handler errors and panics reported as server errors
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lanai_rpc_lib::protocol::jsonrpc::{MethodRegistry, RequestProcessor};
//! use serde_json::json;
//!
//! let mut registry = MethodRegistry::new();
//! registry.register_fn("subtract", ["minuend", "subtrahend"], |args| {
//!     Ok(json!(args.param::<i64>("minuend")? - args.param::<i64>("subtrahend")?))
//! });
//!
//! let processor = RequestProcessor::new(Arc::new(registry));
//! let line = r#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":42,"subtrahend":23},"id":3}"#;
//! let response = futures::executor::block_on(processor.process(line)).unwrap();
//!
//! assert_eq!(response.as_deref(), Some(r#"{"jsonrpc":"2.0","id":3,"result":19}"#));
//! ```

pub mod error;
pub mod handler;
pub mod methods;
pub mod processor;
pub mod registry;
pub mod setup;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-exports
pub use error::{ErrorKind, Result, RpcError};
pub use handler::{Arguments, AsyncHandler, HandlerResult, Invocation, MethodHandler, SyncHandler};
pub use processor::RequestProcessor;
pub use registry::{MethodEntry, MethodRegistry};
pub use setup::{create_registry, register_standard_methods};
pub use types::{ParamsMode, Request, Response, JSONRPC_VERSION};
pub use validation::{validate_request, ValidatedCall};
