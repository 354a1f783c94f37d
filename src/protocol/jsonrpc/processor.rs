// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! JSON-RPC 2.0 request processor.
//!
//! One line in, one of three outcomes out:
//!
//! - `Ok(Some(text))`: a success response to write back
//! - `Ok(None)`: a notification that succeeded, nothing to write
//! - `Err(error)`: a classified failure; [`RpcError::is_fatal`] tells the
//!   connection whether to keep reading
//!
//! Handler failures, including panics, never escape as anything but a
//! server error.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, trace};

use super::error::{Result, RpcError};
use super::handler::Arguments;
use super::registry::{MethodEntry, MethodRegistry};
use super::types::Response;
use super::validation::{validate_request, ValidatedCall};

/// Validates and dispatches request lines against a shared registry.
#[derive(Debug, Clone)]
pub struct RequestProcessor {
    registry: Arc<MethodRegistry>,
}

impl RequestProcessor {
    /// Creates a processor over the given registry.
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self { registry }
    }

    /// Processes one request line.
    ///
    /// If the handler returns a pending result this suspends until it
    /// resolves; only the calling connection waits.
    pub async fn process(&self, line: &str) -> Result<Option<String>> {
        let ValidatedCall {
            id,
            method,
            entry,
            params,
        } = validate_request(line, &self.registry)?;

        trace!(method = %method, asynchronous = entry.is_async(), "Dispatching request");
        let args = Arguments::new(entry.shared_param_names(), params);

        let result = match invoke(entry, args).await {
            Ok(result) => result,
            Err(failure) => {
                debug!(method = %method, error = %failure, "Method handler failed");
                return Err(RpcError::server_error().with_id(id).with_data(failure));
            }
        };

        let Some(id) = id else {
            return Ok(None);
        };

        let response = Response::success(id, result);
        serde_json::to_string(&response).map(Some).map_err(|e| {
            RpcError::server_error()
                .with_id(Some(response.id.clone()))
                .with_data(format!("Failed to serialize result: {e}"))
        })
    }
}

/// Calls the handler and resolves its result, turning errors and panics
/// into a textual description.
async fn invoke(entry: &MethodEntry, args: Arguments) -> std::result::Result<Value, String> {
    let invocation = panic::catch_unwind(AssertUnwindSafe(|| entry.handler().invoke(args)))
        .map_err(panic_message)?;

    if invocation.is_pending() {
        trace!("Awaiting pending handler result");
    }

    AssertUnwindSafe(invocation.resolve())
        .catch_unwind()
        .await
        .map_err(panic_message)?
        .map_err(|e| format!("{e:#}"))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("handler panicked: {detail}")
}
