// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Liveness and diagnostic methods.

use std::time::Duration;

use anyhow::ensure;
use serde_json::{json, Value};

use crate::protocol::jsonrpc::handler::{Arguments, HandlerResult};
use crate::protocol::jsonrpc::registry::MethodRegistry;

/// Upper bound for `sleep`, so a client cannot park a connection for hours.
pub const MAX_SLEEP_MILLIS: u64 = 60_000;

/// `ping()` answers `"pong"`.
pub fn ping(_args: Arguments) -> HandlerResult {
    Ok(json!("pong"))
}

/// `echo(message)` returns its argument unchanged.
pub fn echo(args: Arguments) -> HandlerResult {
    Ok(args.named("message").cloned().unwrap_or(Value::Null))
}

/// `sleep(millis)` waits, then returns the number of milliseconds slept.
///
/// Only the calling connection is held up while this runs.
pub async fn sleep(args: Arguments) -> HandlerResult {
    let millis: u64 = args.param("millis")?;
    ensure!(
        millis <= MAX_SLEEP_MILLIS,
        "millis must be at most {MAX_SLEEP_MILLIS}"
    );
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(json!(millis))
}

/// Registers `ping`, `echo` and `sleep`.
pub fn register_system_methods(registry: &mut MethodRegistry) {
    registry.register_fn("ping", Vec::<&str>::new(), ping);
    registry.register_fn("echo", ["message"], echo);
    registry.register_async("sleep", ["millis"], sleep);
}
